// src/protocol/command.rs
// Fixed command table: keyword -> (kind, minimum sender identity).

use crate::broker::member::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    GetMsg,
    SendMsg,
    ListServers,
    QueryServers,
    KeepAlive,
    Leave,
    StatusReq,
    Connected,
}

/// One row of the dispatch table. `min_identity` is checked declaratively
/// before the handler runs; QUERYSERVERS is the single server-tagged command
/// a not-yet-classified connection may send (it is how peers become servers).
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub min_identity: Identity,
}

const TABLE: &[(&str, CommandSpec)] = &[
    (
        "GET_MSG",
        CommandSpec {
            kind: CommandKind::GetMsg,
            min_identity: Identity::Unclassified,
        },
    ),
    (
        "SEND_MSG",
        CommandSpec {
            kind: CommandKind::SendMsg,
            min_identity: Identity::Unclassified,
        },
    ),
    (
        "LISTSERVERS",
        CommandSpec {
            kind: CommandKind::ListServers,
            min_identity: Identity::Client,
        },
    ),
    (
        "QUERYSERVERS",
        CommandSpec {
            kind: CommandKind::QueryServers,
            min_identity: Identity::Server,
        },
    ),
    (
        "KEEPALIVE",
        CommandSpec {
            kind: CommandKind::KeepAlive,
            min_identity: Identity::Server,
        },
    ),
    (
        "LEAVE",
        CommandSpec {
            kind: CommandKind::Leave,
            min_identity: Identity::Server,
        },
    ),
    (
        "STATUSREQ",
        CommandSpec {
            kind: CommandKind::StatusReq,
            min_identity: Identity::Server,
        },
    ),
    (
        "CONNECTED",
        CommandSpec {
            kind: CommandKind::Connected,
            min_identity: Identity::Server,
        },
    ),
];

/// Look up the first comma field of a command body. `None` means the
/// literal "Unknown command" reply and nothing else.
pub fn lookup(keyword: &str) -> Option<CommandSpec> {
    TABLE
        .iter()
        .find(|(kw, _)| *kw == keyword)
        .map(|(_, spec)| *spec)
}
