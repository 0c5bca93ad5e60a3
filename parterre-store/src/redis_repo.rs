use parterre_domain::SeatState;
use redis::{AsyncCommands, RedisResult};
use tracing::info;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Acquire an exclusive time-bounded hold on a seat.
    ///
    /// Runs as a single server-side script so the existence check and the
    /// write cannot interleave with any other operation on the key. Any
    /// existing value, LOCKED or SOLD, wins the race; the caller's own hold
    /// is a conflict too (holds are not renewable).
    pub async fn acquire_seat_hold(
        &self,
        seat_id: &str,
        user_id: &str,
        ttl_seconds: u64,
    ) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("seat:{}", seat_id);

        let script = redis::Script::new(
            r#"
            if redis.call("EXISTS", KEYS[1]) == 1 then
                return 0
            end
            redis.call("SET", KEYS[1], ARGV[1], "EX", ARGV[2])
            return 1
        "#,
        );

        let acquired: i32 = script
            .key(key)
            .arg(SeatState::locked(user_id).encode())
            .arg(ttl_seconds)
            .invoke_async(&mut conn)
            .await?;

        Ok(acquired == 1)
    }

    /// Delete the hold only if it is still owned by `user_id`. A missing or
    /// foreign lock is left untouched and reported as success.
    pub async fn release_seat_hold(&self, seat_id: &str, user_id: &str) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("seat:{}", seat_id);

        let script = redis::Script::new(
            r#"
            if redis.call("GET", KEYS[1]) == ARGV[1] then
                redis.call("DEL", KEYS[1])
            end
            return 0
        "#,
        );

        let _: i32 = script
            .key(key)
            .arg(SeatState::locked(user_id).encode())
            .invoke_async(&mut conn)
            .await?;

        Ok(())
    }

    pub async fn get_seat_state(&self, seat_id: &str) -> RedisResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("seat:{}", seat_id);
        conn.get(key).await
    }

    /// Overwrite whatever is on the key with the persistent SOLD marker.
    pub async fn mark_seat_sold(&self, seat_id: &str) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("seat:{}", seat_id);
        conn.set(key, SeatState::Sold.encode()).await
    }

    /// All `seat:*` keys with their current value and remaining TTL in
    /// seconds (-1 when the key has no expiry). Keys that vanish between the
    /// scan and the read are skipped.
    pub async fn scan_seat_states(&self) -> RedisResult<Vec<(String, String, i64)>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = conn.scan_match::<_, String>("seat:*").await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let (value, ttl): (Option<String>, i64) = redis::pipe()
                .get(&key)
                .ttl(&key)
                .query_async(&mut conn)
                .await?;

            if let (Some(value), Some(seat_id)) = (value, key.strip_prefix("seat:")) {
                entries.push((seat_id.to_string(), value, ttl));
            }
        }

        Ok(entries)
    }

    pub async fn get_receipt(&self, idempotency_key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("receipt:{}", idempotency_key);
        conn.get(key).await
    }

    pub async fn put_receipt(
        &self,
        idempotency_key: &str,
        payload: &str,
        ttl_seconds: u64,
    ) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("receipt:{}", idempotency_key);
        conn.set_ex(key, payload, ttl_seconds).await
    }

    pub async fn set_otp(&self, email: &str, code: &str, ttl_seconds: u64) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("otp:{}", email);
        conn.set_ex(key, code, ttl_seconds).await
    }

    /// Consume the OTP atomically (GETDEL) so a code can be used only once.
    pub async fn take_otp(&self, email: &str) -> RedisResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("otp:{}", email);
        redis::cmd("GETDEL").arg(key).query_async(&mut conn).await
    }

    /// Count a request against `key`'s window. The counter and its expiry are
    /// set in one script so the window cannot be extended by later hits.
    pub async fn check_rate_limit(
        &self,
        key: &str,
        limit: i64,
        window_seconds: i64,
    ) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let script = redis::Script::new(
            r#"
            local count = redis.call("INCR", KEYS[1])
            if count == 1 then
                redis.call("EXPIRE", KEYS[1], ARGV[1])
            end
            return count
        "#,
        );

        let count: i64 = script
            .key(key)
            .arg(window_seconds)
            .invoke_async(&mut conn)
            .await?;

        Ok(count <= limit)
    }

    /// Admin reset: drop every volatile key (holds, receipts, OTPs, counters).
    pub async fn flush_all(&self) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        info!("Hot state store flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests require a running Redis instance.
    // Run with: docker run -d -p 6379:6379 redis:7-alpine

    const REDIS_URL: &str = "redis://127.0.0.1:6379";

    fn test_seat(prefix: &str) -> String {
        format!("{}-{}", prefix, uuid::Uuid::new_v4())
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn hold_is_exclusive_and_not_renewable() {
        let client = RedisClient::new(REDIS_URL).await.unwrap();
        let seat = test_seat("hold");

        assert!(client.acquire_seat_hold(&seat, "u-1", 60).await.unwrap());
        // Second user loses the race.
        assert!(!client.acquire_seat_hold(&seat, "u-2", 60).await.unwrap());
        // Re-acquiring one's own hold is also a conflict.
        assert!(!client.acquire_seat_hold(&seat, "u-1", 60).await.unwrap());

        client.release_seat_hold(&seat, "u-1").await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn release_is_owner_only_and_idempotent() {
        let client = RedisClient::new(REDIS_URL).await.unwrap();
        let seat = test_seat("release");

        assert!(client.acquire_seat_hold(&seat, "u-1", 60).await.unwrap());

        // Foreign release is a silent no-op.
        client.release_seat_hold(&seat, "u-2").await.unwrap();
        assert!(client.get_seat_state(&seat).await.unwrap().is_some());

        // Owner release frees the seat; repeating it is harmless.
        client.release_seat_hold(&seat, "u-1").await.unwrap();
        client.release_seat_hold(&seat, "u-1").await.unwrap();
        assert!(client.get_seat_state(&seat).await.unwrap().is_none());
        assert!(client.acquire_seat_hold(&seat, "u-3", 60).await.unwrap());

        client.release_seat_hold(&seat, "u-3").await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn expired_hold_frees_the_seat() {
        let client = RedisClient::new(REDIS_URL).await.unwrap();
        let seat = test_seat("expiry");

        assert!(client.acquire_seat_hold(&seat, "u-7", 1).await.unwrap());
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert!(client.acquire_seat_hold(&seat, "u-8", 60).await.unwrap());

        client.release_seat_hold(&seat, "u-8").await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn sold_marker_has_no_expiry() {
        let client = RedisClient::new(REDIS_URL).await.unwrap();
        let seat = test_seat("sold");

        assert!(client.acquire_seat_hold(&seat, "u-1", 60).await.unwrap());
        client.mark_seat_sold(&seat).await.unwrap();

        let state = client.get_seat_state(&seat).await.unwrap().unwrap();
        assert_eq!(state, "SOLD");
        // SOLD beats any further hold attempt.
        assert!(!client.acquire_seat_hold(&seat, "u-2", 60).await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn rate_limit_counts_per_window() {
        let client = RedisClient::new(REDIS_URL).await.unwrap();
        let key = format!("ratelimit:test:{}", uuid::Uuid::new_v4());

        for _ in 0..5 {
            assert!(client.check_rate_limit(&key, 5, 60).await.unwrap());
        }
        assert!(!client.check_rate_limit(&key, 5, 60).await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn otp_is_single_use() {
        let client = RedisClient::new(REDIS_URL).await.unwrap();
        let email = format!("{}@example.com", uuid::Uuid::new_v4());

        client.set_otp(&email, "123456", 60).await.unwrap();
        assert_eq!(
            client.take_otp(&email).await.unwrap(),
            Some("123456".to_string())
        );
        assert_eq!(client.take_otp(&email).await.unwrap(), None);
    }
}
