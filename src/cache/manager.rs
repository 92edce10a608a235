use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::config::Config;
use crate::models::UserProfile;

/// Cached profiles expire 5 minutes after insertion.
/// Profile data changes slowly; 5 minutes keeps repeat navigation cheap
/// without serving stale follower counts for long.
const CACHE_TTL_SECS: i64 = 300;

/// A cached profile plus its absolute expiration timestamp.
/// Owned exclusively by the cache; never handed out.
struct CacheEntry {
    profile: UserProfile,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Process-wide profile cache keyed by login.
/// Clone is cheap - handles share the same map through an Arc, so the
/// application constructs one cache at startup and passes clones to every
/// consumer.
#[derive(Clone)]
pub struct ProfileCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(CACHE_TTL_SECS))
    }

    /// Create a cache with a non-default time-to-live.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Create a cache honoring the configured TTL override, if any.
    pub fn from_config(config: &Config) -> Self {
        match config.cache_ttl_secs {
            Some(secs) => Self::with_ttl(Duration::seconds(secs)),
            None => Self::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A poisoning panic cannot leave the map half-updated; keep serving.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the cached profile for `login` if present and unexpired.
    ///
    /// Lookups are case-sensitive exact matches. An expired entry is
    /// indistinguishable from an absent one and is purged on discovery.
    pub fn get(&self, login: &str) -> Option<UserProfile> {
        let mut entries = self.lock();
        match entries.get(login) {
            Some(entry) if !entry.is_expired() => Some(entry.profile.clone()),
            Some(_) => {
                debug!(login, "purging expired cache entry");
                entries.remove(login);
                None
            }
            None => None,
        }
    }

    /// Store a profile under its own login, resetting its expiration to
    /// now + TTL. Any existing entry for that login is overwritten.
    pub fn put(&self, profile: UserProfile) {
        let expires_at = Utc::now() + self.ttl;
        let mut entries = self.lock();
        debug!(login = %profile.login, %expires_at, "caching profile");
        entries.insert(profile.login.clone(), CacheEntry { profile, expires_at });
    }

    /// Drop every entry unconditionally.
    ///
    /// Safe to call at any time; an in-flight fetch is unaffected and will
    /// simply re-populate the cache on completion.
    pub fn clear(&self) {
        let mut entries = self.lock();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "profile cache cleared");
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Registration point for the host's memory-pressure notification.
    ///
    /// The returned hook clears this cache when signaled; the host wires it
    /// to whatever OS facility it has and unregisters by dropping it.
    pub fn memory_pressure_hook(&self) -> MemoryPressureHook {
        MemoryPressureHook {
            cache: self.clone(),
        }
    }
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle the host registers with its memory-pressure notification.
#[derive(Clone)]
pub struct MemoryPressureHook {
    cache: ProfileCache,
}

impl MemoryPressureHook {
    /// Invoked by the host when the system reports memory pressure.
    /// Drops the entire cache; entries are not evicted individually.
    pub fn signal(&self) {
        info!("memory pressure signaled, dropping profile cache");
        self.cache.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(login: &str) -> UserProfile {
        UserProfile {
            login: login.to_string(),
            avatar_url: format!("https://example.com/{login}.png"),
            name: None,
            bio: None,
            followers: 1,
            following: 2,
            followers_url: format!("https://example.com/users/{login}/followers"),
            following_url: format!("https://example.com/users/{login}/following{{/other_user}}"),
        }
    }

    fn expires_at(cache: &ProfileCache, login: &str) -> DateTime<Utc> {
        cache.lock()[login].expires_at
    }

    fn backdate(cache: &ProfileCache, login: &str, by: Duration) {
        let mut entries = cache.lock();
        let entry = entries.get_mut(login).expect("entry should exist");
        entry.expires_at = entry.expires_at - by;
    }

    #[test]
    fn get_returns_stored_profile() {
        let cache = ProfileCache::new();
        cache.put(profile("octocat"));
        assert_eq!(cache.get("octocat").map(|p| p.login), Some("octocat".to_string()));
        assert!(cache.get("someone-else").is_none());
    }

    #[test]
    fn repeated_put_keeps_value_and_resets_expiration() {
        let cache = ProfileCache::new();
        cache.put(profile("octocat"));

        // Age the entry so the second put's fresh expiration is observable.
        backdate(&cache, "octocat", Duration::seconds(60));
        let aged = expires_at(&cache, "octocat");

        cache.put(profile("octocat"));
        let refreshed = expires_at(&cache, "octocat");

        assert!(refreshed > aged);
        assert_eq!(cache.get("octocat").map(|p| p.login), Some("octocat".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entry_is_absent_and_purged() {
        let cache = ProfileCache::new();
        cache.put(profile("octocat"));
        backdate(&cache, "octocat", Duration::seconds(CACHE_TTL_SECS + 1));

        assert!(cache.get("octocat").is_none());
        // The lookup that discovered the expiry removed the entry.
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let cache = ProfileCache::new();
        cache.put(profile("OctoCat"));
        assert!(cache.get("octocat").is_none());
        assert!(cache.get("OctoCat").is_some());
    }

    #[test]
    fn overwrite_replaces_value() {
        let cache = ProfileCache::new();
        cache.put(profile("octocat"));

        let mut updated = profile("octocat");
        updated.followers = 42;
        cache.put(updated);

        assert_eq!(cache.get("octocat").map(|p| p.followers), Some(42));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let cache = ProfileCache::new();
        cache.put(profile("octocat"));
        cache.put(profile("octodog"));
        cache.clear();

        assert!(cache.get("octocat").is_none());
        assert!(cache.get("octodog").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn memory_pressure_hook_drops_the_cache() {
        let cache = ProfileCache::new();
        let hook = cache.memory_pressure_hook();
        cache.put(profile("octocat"));

        hook.signal();
        assert!(cache.is_empty());

        // The cache stays usable after the signal.
        cache.put(profile("octodog"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clones_share_the_same_map() {
        let cache = ProfileCache::new();
        let handle = cache.clone();
        handle.put(profile("octocat"));
        assert!(cache.get("octocat").is_some());
    }

    #[test]
    fn from_config_honors_ttl_override() {
        let config = Config {
            cache_ttl_secs: Some(1),
            ..Config::default()
        };
        let cache = ProfileCache::from_config(&config);
        cache.put(profile("octocat"));
        backdate(&cache, "octocat", Duration::seconds(2));
        assert!(cache.get("octocat").is_none());
    }
}
