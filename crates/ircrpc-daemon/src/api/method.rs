//! The dispatch table: every method the API knows about

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    ServerList,
    ServerGet,
    ServerRehash,
    ServerConnect,
    ServerDisconnect,
    ServerBanList,
    ServerBanAdd,
    ServerBanDel,
    ChannelList,
    ChannelGet,
    ChannelSetMode,
    ChannelKick,
    UserList,
    UserGet,
    UserSetNick,
    UserSetRealname,
    UserSetVhost,
    UserSetMode,
}

impl Method {
    pub const ALL: [Method; 18] = [
        Method::ServerList,
        Method::ServerGet,
        Method::ServerRehash,
        Method::ServerConnect,
        Method::ServerDisconnect,
        Method::ServerBanList,
        Method::ServerBanAdd,
        Method::ServerBanDel,
        Method::ChannelList,
        Method::ChannelGet,
        Method::ChannelSetMode,
        Method::ChannelKick,
        Method::UserList,
        Method::UserGet,
        Method::UserSetNick,
        Method::UserSetRealname,
        Method::UserSetVhost,
        Method::UserSetMode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::ServerList => "server.list",
            Method::ServerGet => "server.get",
            Method::ServerRehash => "server.rehash",
            Method::ServerConnect => "server.connect",
            Method::ServerDisconnect => "server.disconnect",
            Method::ServerBanList => "server_ban.list",
            Method::ServerBanAdd => "server_ban.add",
            Method::ServerBanDel => "server_ban.del",
            Method::ChannelList => "channel.list",
            Method::ChannelGet => "channel.get",
            Method::ChannelSetMode => "channel.set_mode",
            Method::ChannelKick => "channel.kick",
            Method::UserList => "user.list",
            Method::UserGet => "user.get",
            Method::UserSetNick => "user.set_nick",
            Method::UserSetRealname => "user.set_realname",
            Method::UserSetVhost => "user.set_vhost",
            Method::UserSetMode => "user.set_mode",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }

    /// Declared methods that are refused rather than performed
    pub fn unsupported_reason(self) -> Option<&'static str> {
        match self {
            Method::ServerConnect => Some("Server connection via RPC is not supported"),
            Method::ServerDisconnect => Some("Server disconnection via RPC is not supported"),
            _ => None,
        }
    }

    /// Whether the method changes network state
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            Method::ServerRehash
                | Method::ServerBanAdd
                | Method::ServerBanDel
                | Method::ChannelSetMode
                | Method::ChannelKick
                | Method::UserSetNick
                | Method::UserSetRealname
                | Method::UserSetVhost
                | Method::UserSetMode
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
