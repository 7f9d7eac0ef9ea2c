use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use alloy::primitives::{Address, U256};
use tracing::{debug, warn};

use crate::address::cache_key;
use crate::clock::{Clock, SystemClock};
use crate::node::NodeClient;
use crate::units::to_human;

pub const DEFAULT_DECIMALS: u8 = 18;

/// Token-level constants read from the contract.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenMetadata {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: u8,
    pub total_supply_raw: U256,
    pub total_supply: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            capacity: 10,
        }
    }
}

struct Entry {
    metadata: Arc<TokenMetadata>,
    inserted_at: Instant,
    last_used: Instant,
}

/// Read-through TTL cache of [`TokenMetadata`], keyed by lower-cased token
/// address, evicting the least recently used key when full.
pub struct TokenMetadataCache {
    node: Arc<dyn NodeClient>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    entries: Mutex<HashMap<String, Entry>>,
    /// Serializes fills so concurrent misses don't all hit the node.
    fill: tokio::sync::Mutex<()>,
}

impl TokenMetadataCache {
    pub fn new(node: Arc<dyn NodeClient>) -> Self {
        Self::with_clock(node, CacheConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_clock(
        node: Arc<dyn NodeClient>,
        config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            node,
            clock,
            config,
            entries: Mutex::new(HashMap::new()),
            fill: tokio::sync::Mutex::new(()),
        }
    }

    pub async fn get(&self, token: Address) -> Arc<TokenMetadata> {
        let key = cache_key(&token);
        if let Some(hit) = self.lookup(&key) {
            debug!(token = %key, "metadata cache hit");
            return hit;
        }

        let _fill = self.fill.lock().await;
        // Another caller may have filled it while we waited.
        if let Some(hit) = self.lookup(&key) {
            return hit;
        }

        debug!(token = %key, "metadata cache miss");
        let metadata = Arc::new(fetch_metadata(self.node.as_ref(), token).await);
        self.insert(key, Arc::clone(&metadata));
        metadata
    }

    pub fn invalidate(&self, token: Address) {
        self.lock().remove(&cache_key(&token));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lookup(&self, key: &str) -> Option<Arc<TokenMetadata>> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let expired = match entries.get_mut(key) {
            None => return None,
            Some(entry) if now.duration_since(entry.inserted_at) < self.config.ttl => {
                entry.last_used = now;
                return Some(Arc::clone(&entry.metadata));
            }
            Some(_) => true,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    fn insert(&self, key: String, metadata: Arc<TokenMetadata>) {
        let now = self.clock.now();
        let ttl = self.config.ttl;
        let mut entries = self.lock();

        entries.retain(|_, e| now.duration_since(e.inserted_at) < ttl);

        while !entries.contains_key(&key) && entries.len() >= self.config.capacity.max(1) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    debug!(token = %k, "evicting metadata");
                    entries.remove(&k);
                }
                None => break,
            }
        }

        entries.insert(
            key,
            Entry {
                metadata,
                inserted_at: now,
                last_used: now,
            },
        );
    }
}

/// Read all four metadata fields independently, degrading each to its
/// default on failure.
pub async fn fetch_metadata(node: &dyn NodeClient, token: Address) -> TokenMetadata {
    let (symbol, name, decimals, supply) = tokio::join!(
        node.symbol(token),
        node.name(token),
        node.decimals(token),
        node.total_supply(token),
    );

    let symbol = symbol
        .inspect_err(|e| warn!(%token, error = %e, "symbol() failed"))
        .ok();
    let name = name
        .inspect_err(|e| warn!(%token, error = %e, "name() failed"))
        .ok();
    let decimals = decimals.unwrap_or_else(|e| {
        warn!(%token, error = %e, "decimals() failed, assuming {DEFAULT_DECIMALS}");
        DEFAULT_DECIMALS
    });
    let total_supply_raw = supply.unwrap_or_else(|e| {
        warn!(%token, error = %e, "totalSupply() failed, assuming 0");
        U256::ZERO
    });

    let total_supply = if decimals == 0 {
        0.0
    } else {
        to_human(total_supply_raw, decimals)
    };

    TokenMetadata {
        symbol,
        name,
        decimals,
        total_supply_raw,
        total_supply,
    }
}
