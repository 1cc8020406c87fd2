use crate::services::kv_store::KvStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Signup registration against the remote key-value store.
///
/// Key schema, under a configurable prefix:
/// - `<prefix>:count`: total accepted signups, monotonic
/// - `<prefix>:email:<e>`: ordinal (1-based) at which `<e>` registered;
///   presence of this key is the duplicate guard
/// - `<prefix>:ordinal:<n>`: reverse index, email registered at ordinal n
#[derive(Clone)]
pub struct SignupService {
    store: KvStore,
    key_prefix: String,
    reward_limit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Registered { ordinal: i64, eligible: bool },
    Duplicate,
}

impl SignupService {
    pub fn new(store: KvStore, key_prefix: String, reward_limit: i64) -> Self {
        Self {
            store,
            key_prefix,
            reward_limit,
        }
    }

    fn count_key(&self) -> String {
        format!("{}:count", self.key_prefix)
    }

    fn membership_key(&self, email: &str) -> String {
        format!("{}:email:{}", self.key_prefix, email)
    }

    fn ordinal_key(&self, ordinal: i64) -> String {
        format!("{}:ordinal:{}", self.key_prefix, ordinal)
    }

    /// Register an email and report whether it landed inside the reward
    /// window (the first `reward_limit` accepted signups).
    ///
    /// Duplicate detection and ordinal assignment are each one atomic store
    /// operation: SETNX claims the membership key, INCR hands out the
    /// ordinal. Two concurrent requests for the same email cannot both pass
    /// the claim, and the counter never double-counts. A crash between the
    /// claim and the backfill writes leaves the membership key at the `0`
    /// placeholder, which still blocks duplicates.
    pub async fn register(&self, email: &str) -> Result<SignupOutcome, BoxError> {
        let membership_key = self.membership_key(email);

        let claimed = self.store.set_nx(&membership_key, "0").await?;
        if !claimed {
            tracing::debug!("Duplicate signup attempt for {}", email);
            return Ok(SignupOutcome::Duplicate);
        }

        let ordinal = self.store.incr(&self.count_key()).await?;

        self.store
            .set(&membership_key, &ordinal.to_string())
            .await?;
        self.store.set(&self.ordinal_key(ordinal), email).await?;

        // ordinal <= limit is "count before increment < limit"
        let eligible = ordinal <= self.reward_limit;

        tracing::info!(
            "Registered signup #{} ({}eligible for rewards)",
            ordinal,
            if eligible { "" } else { "not " }
        );

        Ok(SignupOutcome::Registered { ordinal, eligible })
    }

    /// Current accepted-signup count; 0 when the counter key is absent.
    pub async fn total(&self) -> Result<i64, BoxError> {
        let raw = self.store.get(&self.count_key()).await?;
        match raw {
            Some(value) => Ok(value
                .parse::<i64>()
                .map_err(|_| format!("counter key holds a non-integer: {:?}", value))?),
            None => Ok(0),
        }
    }
}
