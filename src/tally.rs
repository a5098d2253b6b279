use std::io::BufRead;

use anyhow::Context;

use crate::collections_ext::counter::Counter;

/// count every non-empty line (trimmed) of the reader
pub fn tally_lines<R: BufRead>(reader: R) -> anyhow::Result<Counter<String>> {
    let mut counter = Counter::new();
    let mut num_lines = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        num_lines += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        counter.add(line.to_string());
    }

    tracing::debug!(
        "tally_lines ::> NumLines: {}, DistinctKeys: {}, Sum: {}",
        num_lines,
        counter.len(),
        counter.sum()
    );
    Ok(counter)
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::tally_lines;

    #[test]
    fn test_tally_lines() {
        let log = "GET /a\nGET /b\n\nGET /a\n  GET /a  \nPOST /c\n";
        let counter = tally_lines(Cursor::new(log)).unwrap();
        assert_eq!(counter.get("GET /a"), 3);
        assert_eq!(counter.get("GET /b"), 1);
        assert_eq!(counter.len(), 3);
        assert_eq!(counter.sum(), 5);

        let top = counter.top(1);
        assert_eq!(top[0].key, "GET /a");
        assert_eq!(top[0].count, 3);
    }

    #[test]
    fn test_tally_lines_bad_utf8() {
        let data: &[u8] = b"ok\n\xff\xfe\n";
        let err = tally_lines(data).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{:#}", err);
    }
}
