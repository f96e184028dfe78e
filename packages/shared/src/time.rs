//! Time-related utilities.
//!
//! The relay keeps all timestamps as Unix milliseconds in UTC and only
//! formats them for the read-only HTTP surface.

use chrono::{TimeZone, Utc};

/// Get current Unix timestamp in UTC (milliseconds)
pub fn get_unix_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to UTC RFC 3339 format
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    let seconds = timestamp_millis / 1000;
    let nanos = ((timestamp_millis % 1000) * 1_000_000) as u32;
    match Utc.timestamp_opt(seconds, nanos) {
        chrono::LocalResult::Single(dt) => dt.to_rfc3339(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unix_timestamp_millis_returns_positive() {
        // テスト項目: 現在時刻のタイムスタンプが 0 より大きい値を返す
        // given (前提条件): なし

        // when (操作):
        let timestamp = get_unix_timestamp_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_timestamp_to_rfc3339_epoch() {
        // テスト項目: Unix エポックが RFC 3339 形式に変換される
        // given (前提条件):
        let timestamp = 0;

        // when (操作):
        let formatted = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert_eq!(formatted, "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_timestamp_to_rfc3339_with_millis() {
        // テスト項目: ミリ秒を含むタイムスタンプが正しく変換される
        // given (前提条件):
        let timestamp = 1_700_000_000_500;

        // when (操作):
        let formatted = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert_eq!(formatted, "2023-11-14T22:13:20.500+00:00");
    }
}
