//! Cluster-scoped row key construction.
//!
//! Rows from different clusters can share names; keys are prefixed with
//! the owning cluster id so the same logical row never collides across
//! scopes. A row without a cluster scope is a programmer error and panics
//! immediately instead of producing a silently colliding key.

/// Build a row key scoped to its cluster: `"{cluster_id}|{name}"`.
///
/// # Panics
///
/// Panics when `cluster_id` is `None` or blank: an unscoped key would
/// collide with same-named rows from other clusters.
pub fn cluster_scoped_key(cluster_id: Option<&str>, name: &str) -> String {
    match cluster_id {
        Some(cluster) if !cluster.trim().is_empty() => format!("{cluster}|{name}"),
        _ => panic!("cluster-scoped key for {name:?} requires a non-empty cluster id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_key_joins_cluster_and_name() {
        assert_eq!(
            cluster_scoped_key(Some("alpha:dev"), "pod-1"),
            "alpha:dev|pod-1"
        );
    }

    #[test]
    #[should_panic(expected = "requires a non-empty cluster id")]
    fn missing_cluster_id_panics() {
        cluster_scoped_key(None, "pod-1");
    }

    #[test]
    #[should_panic(expected = "requires a non-empty cluster id")]
    fn blank_cluster_id_panics() {
        cluster_scoped_key(Some("   "), "pod-1");
    }
}
