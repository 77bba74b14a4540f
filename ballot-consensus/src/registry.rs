use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

use ballot_common::{BallotError, NodeId, Result, Role, RoleAssignment};

/// Static table of who plays which role, built once at startup.
///
/// The source is line oriented: `peerName:role1,role2,...` where every role
/// token ends in its process number (`proposer1`, `acceptor12`). Blank lines
/// and `#` comments are skipped. A peer listed on several lines gets the
/// union of its assignments.
#[derive(Debug, Default, Clone)]
pub struct RoleRegistry {
    // BTree keeps fan-out order stable across runs.
    peers: BTreeMap<NodeId, BTreeSet<RoleAssignment>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self {
            peers: BTreeMap::new(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            BallotError::Config(format!("cannot read registry {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut registry = Self::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let lineno = index + 1;
            let (name, roles) = line.split_once(':').ok_or_else(|| {
                BallotError::Config(format!("line {lineno}: expected 'peer:roles', got '{line}'"))
            })?;

            let name = name.trim();
            if name.is_empty() {
                return Err(BallotError::Config(format!("line {lineno}: empty peer name")));
            }
            // Names travel as the origin field of the wire record, which
            // cannot hold whitespace.
            if name.chars().any(char::is_whitespace) {
                return Err(BallotError::Config(format!(
                    "line {lineno}: peer name '{name}' contains whitespace"
                )));
            }

            let mut assignments = Vec::new();
            for token in roles.split(',') {
                let assignment = token
                    .parse::<RoleAssignment>()
                    .map_err(|e| match e {
                        BallotError::Config(msg) => BallotError::Config(format!("line {lineno}: {msg}")),
                        other => other,
                    })?;
                assignments.push(assignment);
            }

            for assignment in assignments {
                registry.insert(NodeId::from(name), assignment);
            }
        }

        Ok(registry)
    }

    pub fn insert(&mut self, peer: NodeId, assignment: RoleAssignment) {
        self.peers.entry(peer).or_default().insert(assignment);
    }

    pub fn contains(&self, peer: &NodeId) -> bool {
        self.peers.contains_key(peer)
    }

    pub fn peers(&self) -> impl Iterator<Item = &NodeId> {
        self.peers.keys()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn assignments(&self, peer: &NodeId) -> Option<&BTreeSet<RoleAssignment>> {
        self.peers.get(peer)
    }

    /// Roles `peer` activates; empty when the peer is unknown.
    pub fn roles_of(&self, peer: &NodeId) -> BTreeSet<Role> {
        self.peers
            .get(peer)
            .map(|set| set.iter().map(|a| a.role).collect())
            .unwrap_or_default()
    }

    pub fn process_numbers(&self, peer: &NodeId, role: Role) -> BTreeSet<u32> {
        self.peers
            .get(peer)
            .map(|set| {
                set.iter()
                    .filter(|a| a.role == role)
                    .map(|a| a.process_number)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn peers_with(&self, role: Role) -> impl Iterator<Item = &NodeId> {
        self.peers
            .iter()
            .filter(move |(_, set)| set.iter().any(|a| a.role == role))
            .map(|(peer, _)| peer)
    }

    /// Peers holding `role` under at least one of `numbers`, each listed once.
    pub fn peers_matching(&self, role: Role, numbers: &BTreeSet<u32>) -> Vec<NodeId> {
        self.peers
            .iter()
            .filter(|(_, set)| {
                set.iter()
                    .any(|a| a.role == role && numbers.contains(&a.process_number))
            })
            .map(|(peer, _)| peer.clone())
            .collect()
    }

    /// Size of the whole acceptor set, reachable or not.
    pub fn acceptor_count(&self) -> usize {
        self.peers_with(Role::Acceptor).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTS: &str = "\
# five-node layout
alpha:proposer1,learner1
bravo:acceptor1
charlie:acceptor1,acceptor2

delta:acceptor2,learner2
echo:proposer2
";

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_parse_roles_and_numbers() {
        let registry = RoleRegistry::parse(HOSTS).unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(
            registry.roles_of(&id("alpha")),
            BTreeSet::from([Role::Proposer, Role::Learner])
        );
        assert_eq!(
            registry.process_numbers(&id("charlie"), Role::Acceptor),
            BTreeSet::from([1, 2])
        );
        assert!(registry.roles_of(&id("zulu")).is_empty());
        assert_eq!(registry.acceptor_count(), 3);
    }

    #[test]
    fn test_peers_matching_lists_each_peer_once() {
        let registry = RoleRegistry::parse(HOSTS).unwrap();

        let both = BTreeSet::from([1, 2]);
        assert_eq!(
            registry.peers_matching(Role::Acceptor, &both),
            vec![id("bravo"), id("charlie"), id("delta")]
        );

        let one = BTreeSet::from([1]);
        assert_eq!(
            registry.peers_matching(Role::Acceptor, &one),
            vec![id("bravo"), id("charlie")]
        );
        assert_eq!(registry.peers_matching(Role::Learner, &one), vec![id("alpha")]);
        assert!(registry.peers_matching(Role::Learner, &BTreeSet::from([9])).is_empty());
    }

    #[test]
    fn test_repeated_peer_lines_merge() {
        let registry = RoleRegistry::parse("a:acceptor1\na:learner1\n").unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.assignments(&id("a")).unwrap().len(), 2);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let registry = RoleRegistry::parse("  host1 : proposer1 , acceptor1 \n").unwrap();
        assert_eq!(
            registry.roles_of(&id("host1")),
            BTreeSet::from([Role::Proposer, Role::Acceptor])
        );
    }

    #[test]
    fn test_malformed_lines_report_line_number() {
        let err = RoleRegistry::parse("a:acceptor1\nno-colon-here\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");

        let err = RoleRegistry::parse(":acceptor1").unwrap_err();
        assert!(err.to_string().contains("empty peer name"), "{err}");

        let err = RoleRegistry::parse("a:acceptor1,").unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");

        let err = RoleRegistry::parse("a:acceptor").unwrap_err();
        assert!(matches!(err, BallotError::Config(_)));
    }

    #[test]
    fn test_peer_names_with_whitespace_are_rejected() {
        let err = RoleRegistry::parse("a:acceptor1\nmy host:proposer1\n").unwrap_err();
        assert!(matches!(err, BallotError::Config(_)));
        assert!(err.to_string().contains("line 2"), "{err}");

        let err = RoleRegistry::parse("tab\there:learner1").unwrap_err();
        assert!(err.to_string().contains("whitespace"), "{err}");
    }

    #[test]
    fn test_every_registry_name_survives_the_wire() {
        let registry = RoleRegistry::parse(HOSTS).unwrap();
        for peer in registry.peers() {
            let p = ballot_common::Proposal::new(1, 'x', peer.clone());
            let bytes = ballot_p2p::codec::encode(&p);
            assert_eq!(ballot_p2p::codec::decode(&bytes).unwrap(), p);
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hostsfile.txt");
        std::fs::write(&path, HOSTS).unwrap();

        let registry = RoleRegistry::load_from_file(&path).unwrap();
        assert_eq!(registry.acceptor_count(), 3);

        let missing = RoleRegistry::load_from_file(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(missing, BallotError::Config(_)));
    }
}
