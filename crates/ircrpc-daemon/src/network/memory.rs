//! In-memory host service
//!
//! A self-contained implementation of [`Network`] holding users, channels,
//! bans and linked servers behind one lock. The daemon binary runs on it and
//! the API tests use it as their collaborator.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{Network, NetworkError, Result};
use ircrpc_core::models::{
    BanKind, ChannelInfo, NetworkConfig, NewBan, ServerBan, ServerInfo, UserInfo,
};

const MAX_NICK_LEN: usize = 30;
const MAX_CHANNEL_LEN: usize = 64;
const MAX_REALNAME_LEN: usize = 128;
const MAX_HOST_LEN: usize = 64;

/// Channel modes settable by name. The flag is true for modes taking a parameter.
const CHANNEL_MODES: &[(&str, char, bool)] = &[
    ("inviteonly", 'i', false),
    ("key", 'k', true),
    ("limit", 'l', true),
    ("moderated", 'm', false),
    ("noextmsg", 'n', false),
    ("private", 'p', false),
    ("secret", 's', false),
    ("topiclock", 't', false),
];

const USER_MODES: &[char] = &['i', 'w', 's', 'x', 'B'];

/// rfc1459 case mapping
pub fn irc_fold(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '[' => '{',
            ']' => '}',
            '\\' => '|',
            '~' => '^',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

pub fn is_valid_nick(nick: &str) -> bool {
    let special = |c: char| "[]\\`^_{|}".contains(c);
    let mut chars = nick.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || special(first) => {}
        _ => return false,
    }
    nick.len() <= MAX_NICK_LEN && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || special(c))
}

pub fn is_valid_channel_name(name: &str) -> bool {
    name.starts_with('#')
        && name.len() > 1
        && name.len() <= MAX_CHANNEL_LEN
        && !name.contains([' ', ',', '\x07'])
}

fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && host.len() <= MAX_HOST_LEN
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '/'))
}

#[derive(Debug, Clone)]
struct User {
    nick: String,
    uuid: String,
    realname: String,
    host: String,
    vhost: Option<String>,
    ip: String,
    modes: BTreeSet<char>,
    away: Option<String>,
}

impl User {
    fn info(&self) -> UserInfo {
        UserInfo {
            nick: self.nick.clone(),
            uuid: self.uuid.clone(),
            realname: self.realname.clone(),
            host: self.vhost.clone().unwrap_or_else(|| self.host.clone()),
            ip: self.ip.clone(),
            oper: self.modes.contains(&'o'),
            away: self.away.is_some(),
        }
    }
}

#[derive(Debug, Clone)]
struct Channel {
    name: String,
    topic: String,
    /// Member UUIDs
    members: BTreeSet<String>,
    flags: BTreeSet<char>,
    key: Option<String>,
    limit: Option<u32>,
}

impl Channel {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            topic: String::new(),
            members: BTreeSet::new(),
            flags: ['n', 't'].into_iter().collect(),
            key: None,
            limit: None,
        }
    }

    fn mode_string(&self) -> String {
        let mut letters = self.flags.clone();
        if self.key.is_some() {
            letters.insert('k');
        }
        if self.limit.is_some() {
            letters.insert('l');
        }

        let mut modes: String = std::iter::once('+').chain(letters.iter().copied()).collect();
        for letter in &letters {
            match letter {
                'k' => modes.push_str(&format!(" {}", self.key.as_deref().unwrap_or_default())),
                'l' => modes.push_str(&format!(" {}", self.limit.unwrap_or_default())),
                _ => {}
            }
        }
        modes
    }

    fn info(&self) -> ChannelInfo {
        ChannelInfo {
            name: self.name.clone(),
            num_users: self.members.len() as u32,
            topic: self.topic.clone(),
            modes: self.mode_string(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    /// Keyed by UUID
    users: HashMap<String, User>,
    /// Folded nick to UUID
    nicks: HashMap<String, String>,
    /// Keyed by folded name
    channels: HashMap<String, Channel>,
    bans: HashMap<(BanKind, String), ServerBan>,
    remote_servers: Vec<ServerInfo>,
    rehash_count: u64,
}

impl State {
    fn user_uuid(&self, nick: &str) -> Result<String> {
        self.nicks
            .get(&irc_fold(nick))
            .cloned()
            .ok_or_else(|| NetworkError::NoSuchUser(nick.to_string()))
    }

    fn user_mut(&mut self, nick: &str) -> Result<&mut User> {
        let uuid = self.user_uuid(nick)?;
        self.users
            .get_mut(&uuid)
            .ok_or_else(|| NetworkError::NoSuchUser(nick.to_string()))
    }

    fn channel_mut(&mut self, name: &str) -> Result<&mut Channel> {
        self.channels
            .get_mut(&irc_fold(name))
            .ok_or_else(|| NetworkError::NoSuchChannel(name.to_string()))
    }

    fn purge_expired_bans(&mut self) -> usize {
        let now = Utc::now().timestamp();
        let before = self.bans.len();
        self.bans.retain(|_, ban| !ban.is_expired(now));
        before - self.bans.len()
    }
}

pub struct MemoryNetwork {
    local: NetworkConfig,
    state: RwLock<State>,
}

impl MemoryNetwork {
    pub fn new(local: NetworkConfig) -> Self {
        Self {
            local,
            state: RwLock::new(State::default()),
        }
    }

    /// Record a linked remote server
    pub fn add_server(&self, server: ServerInfo) {
        self.state.write().remote_servers.push(server);
    }

    /// Register a connected user and return its UUID
    pub fn add_user(&self, nick: &str, realname: &str, host: &str, ip: &str) -> Result<String> {
        if !is_valid_nick(nick) {
            return Err(NetworkError::Denied(format!("Erroneous nickname: {}", nick)));
        }

        let mut state = self.state.write();
        let folded = irc_fold(nick);
        if state.nicks.contains_key(&folded) {
            return Err(NetworkError::Denied(format!(
                "Nickname is already in use: {}",
                nick
            )));
        }

        let uuid = Uuid::new_v4().simple().to_string();
        state.nicks.insert(folded, uuid.clone());
        state.users.insert(
            uuid.clone(),
            User {
                nick: nick.to_string(),
                uuid: uuid.clone(),
                realname: realname.to_string(),
                host: host.to_string(),
                vhost: None,
                ip: ip.to_string(),
                modes: BTreeSet::new(),
                away: None,
            },
        );

        Ok(uuid)
    }

    /// Remove a user from the network and from every channel
    pub fn quit_user(&self, nick: &str) -> Result<()> {
        let mut state = self.state.write();
        let uuid = state.user_uuid(nick)?;
        state.nicks.remove(&irc_fold(nick));
        state.users.remove(&uuid);
        for channel in state.channels.values_mut() {
            channel.members.remove(&uuid);
        }
        state.channels.retain(|_, channel| !channel.members.is_empty());
        Ok(())
    }

    /// Join a user to a channel, creating it with `+nt` if needed
    pub fn join(&self, nick: &str, channel: &str) -> Result<()> {
        if !is_valid_channel_name(channel) {
            return Err(NetworkError::Denied(format!("Invalid channel name: {}", channel)));
        }

        let mut state = self.state.write();
        let uuid = state.user_uuid(nick)?;
        state
            .channels
            .entry(irc_fold(channel))
            .or_insert_with(|| Channel::new(channel))
            .members
            .insert(uuid);
        Ok(())
    }

    pub fn set_topic(&self, channel: &str, topic: &str) -> Result<()> {
        self.state.write().channel_mut(channel)?.topic = topic.to_string();
        Ok(())
    }

    pub fn set_away(&self, nick: &str, message: Option<&str>) -> Result<()> {
        self.state.write().user_mut(nick)?.away = message.map(str::to_string);
        Ok(())
    }

    pub fn set_oper(&self, nick: &str, oper: bool) -> Result<()> {
        let mut state = self.state.write();
        let user = state.user_mut(nick)?;
        if oper {
            user.modes.insert('o');
        } else {
            user.modes.remove(&'o');
        }
        Ok(())
    }

    /// Whether `nick` is currently on `channel`
    pub fn is_member(&self, nick: &str, channel: &str) -> bool {
        let state = self.state.read();
        match (state.user_uuid(nick), state.channels.get(&irc_fold(channel))) {
            (Ok(uuid), Some(channel)) => channel.members.contains(&uuid),
            _ => false,
        }
    }

    /// User modes as a `+letters` string
    pub fn user_modes(&self, nick: &str) -> Option<String> {
        let state = self.state.read();
        let uuid = state.user_uuid(nick).ok()?;
        state
            .users
            .get(&uuid)
            .map(|user| std::iter::once('+').chain(user.modes.iter().copied()).collect())
    }

    pub fn rehash_count(&self) -> u64 {
        self.state.read().rehash_count
    }
}

impl Network for MemoryNetwork {
    fn servers(&self) -> Result<Vec<ServerInfo>> {
        let state = self.state.read();
        let op_count = state.users.values().filter(|u| u.modes.contains(&'o')).count();

        let mut servers = vec![ServerInfo {
            name: self.local.server_name.clone(),
            parent: String::new(),
            description: self.local.description.clone(),
            user_count: state.users.len() as u32,
            op_count: op_count as u32,
            latency_ms: 0,
        }];
        servers.extend(state.remote_servers.iter().cloned());
        Ok(servers)
    }

    fn rehash(&self) -> Result<()> {
        let mut state = self.state.write();
        let purged = state.purge_expired_bans();
        state.rehash_count += 1;
        tracing::info!(
            "Rehashed {} (expired bans purged: {})",
            self.local.server_name,
            purged
        );
        Ok(())
    }

    fn bans(&self, kind: BanKind) -> Result<Vec<ServerBan>> {
        let mut state = self.state.write();
        state.purge_expired_bans();

        let mut bans: Vec<ServerBan> = state
            .bans
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, ban)| ban.clone())
            .collect();
        bans.sort_by(|a, b| a.mask.cmp(&b.mask));
        Ok(bans)
    }

    fn add_ban(&self, ban: NewBan) -> Result<()> {
        let mut state = self.state.write();
        state.purge_expired_bans();

        let key = (ban.kind, irc_fold(&ban.mask));
        if state.bans.contains_key(&key) {
            return Err(NetworkError::BanExists(ban.mask));
        }

        let expiry = match ban.duration {
            0 => 0,
            duration => i64::try_from(duration)
                .ok()
                .and_then(|duration| Utc::now().timestamp().checked_add(duration))
                .ok_or_else(|| {
                    NetworkError::Denied(format!("Ban duration out of range: {}", duration))
                })?,
        };
        tracing::info!("{}-line added on {} by {}", ban.kind, ban.mask, ban.set_by);
        state.bans.insert(
            key,
            ServerBan {
                mask: ban.mask,
                set_by: ban.set_by,
                reason: ban.reason,
                expiry,
            },
        );
        Ok(())
    }

    fn remove_ban(&self, mask: &str, kind: BanKind) -> Result<()> {
        let mut state = self.state.write();
        state.purge_expired_bans();

        match state.bans.remove(&(kind, irc_fold(mask))) {
            Some(_) => {
                tracing::info!("{}-line removed on {}", kind, mask);
                Ok(())
            }
            None => Err(NetworkError::NoSuchBan(mask.to_string())),
        }
    }

    fn channels(&self) -> Result<Vec<ChannelInfo>> {
        let state = self.state.read();
        let mut channels: Vec<ChannelInfo> = state.channels.values().map(Channel::info).collect();
        channels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(channels)
    }

    fn find_channel(&self, name: &str) -> Result<Option<ChannelInfo>> {
        Ok(self.state.read().channels.get(&irc_fold(name)).map(Channel::info))
    }

    fn set_channel_mode(&self, channel: &str, mode: &str, param: &str) -> Result<()> {
        let mut state = self.state.write();
        let chan = state.channel_mut(channel)?;

        let (_, letter, _) = CHANNEL_MODES
            .iter()
            .find(|(name, _, _)| *name == mode)
            .ok_or_else(|| NetworkError::UnknownMode(mode.to_string()))?;

        match letter {
            'k' => {
                if param.is_empty() || param.contains(char::is_whitespace) || param.contains(',') {
                    return Err(NetworkError::Denied(format!("Invalid channel key: {}", param)));
                }
                chan.key = Some(param.to_string());
            }
            'l' => {
                let limit = param
                    .parse::<u32>()
                    .ok()
                    .filter(|limit| *limit > 0)
                    .ok_or_else(|| NetworkError::Denied(format!("Invalid limit: {}", param)))?;
                chan.limit = Some(limit);
            }
            letter => {
                chan.flags.insert(*letter);
            }
        }

        tracing::info!("Mode +{} set on {}", letter, chan.name);
        Ok(())
    }

    fn kick_user(&self, source: &str, channel: &str, nick: &str, reason: &str) -> Result<()> {
        let mut state = self.state.write();
        let folded_channel = irc_fold(channel);
        if !state.channels.contains_key(&folded_channel) {
            return Err(NetworkError::NoSuchChannel(channel.to_string()));
        }
        let uuid = state.user_uuid(nick)?;

        let chan = state.channel_mut(channel)?;
        if !chan.members.remove(&uuid) {
            return Err(NetworkError::Denied(format!(
                "{} is not on channel {}",
                nick, channel
            )));
        }

        tracing::info!("{} kicked {} from {} ({})", source, nick, chan.name, reason);
        if chan.members.is_empty() {
            state.channels.remove(&folded_channel);
        }
        Ok(())
    }

    fn users(&self) -> Result<Vec<UserInfo>> {
        let state = self.state.read();
        let mut users: Vec<UserInfo> = state.users.values().map(User::info).collect();
        users.sort_by(|a, b| irc_fold(&a.nick).cmp(&irc_fold(&b.nick)));
        Ok(users)
    }

    fn find_user(&self, nick: &str) -> Result<Option<UserInfo>> {
        let state = self.state.read();
        Ok(state
            .nicks
            .get(&irc_fold(nick))
            .and_then(|uuid| state.users.get(uuid))
            .map(User::info))
    }

    fn change_nick(&self, nick: &str, new_nick: &str) -> Result<()> {
        let mut state = self.state.write();
        let uuid = state.user_uuid(nick)?;

        if !is_valid_nick(new_nick) {
            return Err(NetworkError::Denied(format!("Erroneous nickname: {}", new_nick)));
        }

        let old_folded = irc_fold(nick);
        let new_folded = irc_fold(new_nick);
        if new_folded != old_folded && state.nicks.contains_key(&new_folded) {
            return Err(NetworkError::Denied(format!(
                "Nickname is already in use: {}",
                new_nick
            )));
        }

        state.nicks.remove(&old_folded);
        state.nicks.insert(new_folded, uuid.clone());
        if let Some(user) = state.users.get_mut(&uuid) {
            tracing::info!("{} changed nick to {}", user.nick, new_nick);
            user.nick = new_nick.to_string();
        }
        Ok(())
    }

    fn change_realname(&self, nick: &str, realname: &str) -> Result<()> {
        let mut state = self.state.write();
        let user = state.user_mut(nick)?;

        if realname.is_empty() || realname.len() > MAX_REALNAME_LEN {
            return Err(NetworkError::Denied(format!("Invalid real name for {}", nick)));
        }

        user.realname = realname.to_string();
        Ok(())
    }

    fn change_host(&self, nick: &str, host: &str) -> Result<()> {
        let mut state = self.state.write();
        let user = state.user_mut(nick)?;

        if !is_valid_host(host) {
            return Err(NetworkError::Denied(format!("Invalid host: {}", host)));
        }

        tracing::info!("Displayed host of {} set to {}", user.nick, host);
        user.vhost = Some(host.to_string());
        Ok(())
    }

    fn change_modes(&self, nick: &str, modes: &str) -> Result<()> {
        let mut state = self.state.write();
        let user = state.user_mut(nick)?;

        let mut adding = match modes.chars().next() {
            Some('+') => true,
            Some('-') => false,
            _ => return Err(NetworkError::Denied(format!("Invalid mode string: {}", modes))),
        };

        // Validate the whole string before touching the user
        let mut changes = Vec::new();
        for c in modes.chars() {
            match c {
                '+' => adding = true,
                '-' => adding = false,
                'o' if !adding => changes.push((false, 'o')),
                c if USER_MODES.contains(&c) => changes.push((adding, c)),
                c => {
                    return Err(NetworkError::Denied(format!(
                        "Mode {}{} cannot be changed",
                        if adding { '+' } else { '-' },
                        c
                    )))
                }
            }
        }

        if changes.is_empty() {
            return Err(NetworkError::Denied(format!("Invalid mode string: {}", modes)));
        }

        for (add, letter) in changes {
            if add {
                user.modes.insert(letter);
            } else {
                user.modes.remove(&letter);
            }
        }
        Ok(())
    }

    fn local_server(&self) -> String {
        self.local.server_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> MemoryNetwork {
        let network = MemoryNetwork::new(NetworkConfig::default());
        network.add_user("alice", "Alice", "alice.example", "192.0.2.1").unwrap();
        network.add_user("bob", "Bob", "bob.example", "192.0.2.2").unwrap();
        network.join("alice", "#rust").unwrap();
        network.join("bob", "#rust").unwrap();
        network
    }

    fn gline(mask: &str, duration: u64) -> NewBan {
        NewBan {
            kind: BanKind::GLine,
            mask: mask.to_string(),
            set_by: "tester".to_string(),
            reason: "testing".to_string(),
            duration,
        }
    }

    #[test]
    fn test_irc_fold() {
        assert_eq!(irc_fold("Alice[Away]"), "alice{away}");
        assert_eq!(irc_fold("a\\b~"), "a|b^");
    }

    #[test]
    fn test_nick_validation() {
        assert!(is_valid_nick("alice"));
        assert!(is_valid_nick("[bot]_2"));
        assert!(!is_valid_nick(""));
        assert!(!is_valid_nick("1alice"));
        assert!(!is_valid_nick("-alice"));
        assert!(!is_valid_nick("al ice"));
        assert!(!is_valid_nick(&"a".repeat(31)));
    }

    #[test]
    fn test_local_server_counts() {
        let network = network();
        network.set_oper("alice", true).unwrap();

        let servers = network.servers().unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "irc.local");
        assert_eq!(servers[0].user_count, 2);
        assert_eq!(servers[0].op_count, 1);
    }

    #[test]
    fn test_duplicate_user_rejected() {
        let network = network();
        let result = network.add_user("ALICE", "Other", "h", "192.0.2.9");
        assert!(matches!(result, Err(NetworkError::Denied(_))));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let network = network();
        assert!(network.find_user("ALICE").unwrap().is_some());
        assert_eq!(network.find_channel("#RUST").unwrap().unwrap().name, "#rust");
    }

    #[test]
    fn test_channel_defaults() {
        let network = network();
        let channel = network.find_channel("#rust").unwrap().unwrap();
        assert_eq!(channel.num_users, 2);
        assert_eq!(channel.modes, "+nt");
    }

    #[test]
    fn test_channel_mode_string_with_params() {
        let network = network();
        network.set_channel_mode("#rust", "key", "sekrit").unwrap();
        network.set_channel_mode("#rust", "limit", "10").unwrap();
        network.set_channel_mode("#rust", "moderated", "").unwrap();

        let channel = network.find_channel("#rust").unwrap().unwrap();
        assert_eq!(channel.modes, "+klmnt sekrit 10");
    }

    #[test]
    fn test_channel_mode_errors() {
        let network = network();
        assert_eq!(
            network.set_channel_mode("#nowhere", "moderated", ""),
            Err(NetworkError::NoSuchChannel("#nowhere".to_string()))
        );
        assert_eq!(
            network.set_channel_mode("#rust", "bogus", ""),
            Err(NetworkError::UnknownMode("bogus".to_string()))
        );
        assert!(matches!(
            network.set_channel_mode("#rust", "limit", "0"),
            Err(NetworkError::Denied(_))
        ));
    }

    #[test]
    fn test_kick() {
        let network = network();
        network.kick_user("irc.local", "#rust", "bob", "bye").unwrap();
        assert!(!network.is_member("bob", "#rust"));

        assert!(matches!(
            network.kick_user("irc.local", "#rust", "bob", "again"),
            Err(NetworkError::Denied(_))
        ));
        assert_eq!(
            network.kick_user("irc.local", "#rust", "carol", "who"),
            Err(NetworkError::NoSuchUser("carol".to_string()))
        );
    }

    #[test]
    fn test_kick_last_member_removes_channel() {
        let network = network();
        network.kick_user("irc.local", "#rust", "bob", "bye").unwrap();
        network.kick_user("irc.local", "#rust", "alice", "bye").unwrap();
        assert!(network.find_channel("#rust").unwrap().is_none());
    }

    #[test]
    fn test_change_nick() {
        let network = network();
        network.change_nick("alice", "Alicia").unwrap();
        assert!(network.find_user("alice").unwrap().is_none());
        assert_eq!(network.find_user("alicia").unwrap().unwrap().nick, "Alicia");
        assert!(network.is_member("Alicia", "#rust"));

        // Case change of one's own nick is allowed
        network.change_nick("Alicia", "ALICIA").unwrap();
        assert_eq!(network.find_user("alicia").unwrap().unwrap().nick, "ALICIA");
    }

    #[test]
    fn test_change_nick_denied() {
        let network = network();
        assert!(matches!(
            network.change_nick("alice", "Bob"),
            Err(NetworkError::Denied(_))
        ));
        assert!(matches!(
            network.change_nick("alice", "9lives"),
            Err(NetworkError::Denied(_))
        ));
    }

    #[test]
    fn test_change_host_and_realname() {
        let network = network();
        network.change_host("alice", "staff.example.net").unwrap();
        network.change_realname("alice", "Alice Liddell").unwrap();

        let user = network.find_user("alice").unwrap().unwrap();
        assert_eq!(user.host, "staff.example.net");
        assert_eq!(user.realname, "Alice Liddell");

        assert!(network.change_host("alice", "bad host").is_err());
        assert!(network.change_realname("alice", "").is_err());
    }

    #[test]
    fn test_change_modes() {
        let network = network();
        network.change_modes("alice", "+iw").unwrap();
        assert_eq!(network.user_modes("alice").unwrap(), "+iw");

        network.change_modes("alice", "-w+x").unwrap();
        assert_eq!(network.user_modes("alice").unwrap(), "+ix");

        network.set_oper("alice", true).unwrap();
        network.change_modes("alice", "-o").unwrap();
        assert!(!network.find_user("alice").unwrap().unwrap().oper);
    }

    #[test]
    fn test_change_modes_denied_leaves_user_untouched() {
        let network = network();
        assert!(network.change_modes("alice", "+iZ").is_err());
        assert!(network.change_modes("alice", "+o").is_err());
        assert!(network.change_modes("alice", "iw").is_err());
        assert!(network.change_modes("alice", "+").is_err());
        assert_eq!(network.user_modes("alice").unwrap(), "+");
    }

    #[test]
    fn test_ban_lifecycle() {
        let network = network();
        network.add_ban(gline("*@evil.example", 3600)).unwrap();
        assert_eq!(
            network.add_ban(gline("*@EVIL.example", 60)),
            Err(NetworkError::BanExists("*@EVIL.example".to_string()))
        );

        let bans = network.bans(BanKind::GLine).unwrap();
        assert_eq!(bans.len(), 1);
        assert!(bans[0].expiry > Utc::now().timestamp());
        assert!(network.bans(BanKind::KLine).unwrap().is_empty());

        network.remove_ban("*@evil.example", BanKind::GLine).unwrap();
        assert_eq!(
            network.remove_ban("*@evil.example", BanKind::GLine),
            Err(NetworkError::NoSuchBan("*@evil.example".to_string()))
        );
    }

    #[test]
    fn test_out_of_range_duration_denied() {
        let network = network();
        for duration in [u64::MAX, i64::MAX as u64] {
            assert!(matches!(
                network.add_ban(gline("*@far.example", duration)),
                Err(NetworkError::Denied(_))
            ));
        }
        assert!(network.bans(BanKind::GLine).unwrap().is_empty());
    }

    #[test]
    fn test_permanent_ban() {
        let network = network();
        network.add_ban(gline("*@forever.example", 0)).unwrap();
        assert_eq!(network.bans(BanKind::GLine).unwrap()[0].expiry, 0);
    }

    #[test]
    fn test_expired_bans_are_purged() {
        let network = network();
        network.add_ban(gline("*@old.example", 3600)).unwrap();
        network
            .state
            .write()
            .bans
            .values_mut()
            .for_each(|ban| ban.expiry = 1);

        network.rehash().unwrap();
        assert!(network.bans(BanKind::GLine).unwrap().is_empty());
        assert_eq!(network.rehash_count(), 1);
    }

    #[test]
    fn test_quit_user() {
        let network = network();
        network.quit_user("bob").unwrap();
        assert!(network.find_user("bob").unwrap().is_none());
        assert_eq!(network.find_channel("#rust").unwrap().unwrap().num_users, 1);
    }
}
