//! API method definitions.
//!
//! An [`Endpoint`] is static metadata: the method name, how the call is
//! authenticated, and how its arguments are encoded. The catalogue below
//! covers the auth handshake plus a few common calls; any other method can
//! be described ad hoc with [`Endpoint::new`].

use crate::args::FormatRules;

/// How a call is sent and authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Unsigned GET on the plain endpoint
    Get,
    /// Signed POST without a session key (handshake steps)
    Signed,
    /// Signed POST on behalf of a user; requires a session key
    SignedSession,
}

/// One API method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    /// Method name, e.g. `track.scrobble`
    pub method: &'a str,
    pub kind: CallKind,
    pub rules: FormatRules<'a>,
}

impl<'a> Endpoint<'a> {
    pub const fn new(method: &'a str, kind: CallKind, rules: FormatRules<'a>) -> Self {
        Self {
            method,
            kind,
            rules,
        }
    }

    /// Find a catalogued method by name.
    pub fn lookup(method: &str) -> Option<&'static Endpoint<'static>> {
        CATALOGUE.iter().copied().find(|e| e.method == method)
    }
}

pub const AUTH_GET_TOKEN: Endpoint<'static> =
    Endpoint::new("auth.getToken", CallKind::Get, FormatRules::normal(&[]));

pub const AUTH_GET_SESSION: Endpoint<'static> = Endpoint::new(
    "auth.getSession",
    CallKind::Signed,
    FormatRules::normal(&["token"]),
);

pub const AUTH_GET_MOBILE_SESSION: Endpoint<'static> = Endpoint::new(
    "auth.getMobileSession",
    CallKind::Signed,
    FormatRules::normal(&["username", "password"]),
);

pub const ARTIST_GET_INFO: Endpoint<'static> = Endpoint::new(
    "artist.getInfo",
    CallKind::Get,
    FormatRules::normal(&["artist", "mbid", "lang", "autocorrect", "username"]),
);

pub const USER_GET_RECENT_TRACKS: Endpoint<'static> = Endpoint::new(
    "user.getRecentTracks",
    CallKind::Get,
    FormatRules::normal(&["user", "limit", "page", "from", "to", "extended"]),
);

/// Batch scrobble: every field is indexed so up to 50 plays can be sent at once.
pub const TRACK_SCROBBLE: Endpoint<'static> = Endpoint::new(
    "track.scrobble",
    CallKind::SignedSession,
    FormatRules::new(
        &[
            "artist",
            "track",
            "timestamp",
            "album",
            "context",
            "streamId",
            "chosenByUser",
            "trackNumber",
            "mbid",
            "albumArtist",
            "duration",
        ],
        &[],
    ),
);

pub const TRACK_UPDATE_NOW_PLAYING: Endpoint<'static> = Endpoint::new(
    "track.updateNowPlaying",
    CallKind::SignedSession,
    FormatRules::normal(&[
        "artist",
        "track",
        "album",
        "trackNumber",
        "context",
        "mbid",
        "duration",
        "albumArtist",
    ]),
);

pub const TRACK_LOVE: Endpoint<'static> = Endpoint::new(
    "track.love",
    CallKind::SignedSession,
    FormatRules::normal(&["artist", "track"]),
);

pub const TRACK_ADD_TAGS: Endpoint<'static> = Endpoint::new(
    "track.addTags",
    CallKind::SignedSession,
    FormatRules::normal(&["artist", "track", "tags"]),
);

const CATALOGUE: &[&Endpoint<'static>] = &[
    &AUTH_GET_TOKEN,
    &AUTH_GET_SESSION,
    &AUTH_GET_MOBILE_SESSION,
    &ARTIST_GET_INFO,
    &USER_GET_RECENT_TRACKS,
    &TRACK_SCROBBLE,
    &TRACK_UPDATE_NOW_PLAYING,
    &TRACK_LOVE,
    &TRACK_ADD_TAGS,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let endpoint = Endpoint::lookup("track.scrobble").unwrap();
        assert_eq!(endpoint.kind, CallKind::SignedSession);
        assert!(endpoint.rules.indexing.contains(&"timestamp"));
        assert!(Endpoint::lookup("track.nope").is_none());
    }

    #[test]
    fn test_handshake_kinds() {
        assert_eq!(AUTH_GET_TOKEN.kind, CallKind::Get);
        assert_eq!(AUTH_GET_SESSION.kind, CallKind::Signed);
        assert_eq!(AUTH_GET_MOBILE_SESSION.kind, CallKind::Signed);
    }

    #[test]
    fn test_catalogue_names_are_unique() {
        for (i, a) in CATALOGUE.iter().enumerate() {
            for b in &CATALOGUE[i + 1..] {
                assert_ne!(a.method, b.method);
            }
        }
    }
}
