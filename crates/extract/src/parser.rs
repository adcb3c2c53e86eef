use crate::schema::TransactionRecord;

/// Parse `key: value` lines from a model reply.
///
/// Lines without a colon are skipped. Only the first colon splits, so
/// `time_of_day: 18:23` keeps `18:23` as the value.
pub fn parse_reply(reply: &str) -> TransactionRecord {
    let mut record = TransactionRecord::new();

    for line in reply.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        record.insert(key.trim(), value.trim());
    }

    record
}
