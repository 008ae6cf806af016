//! Parses backend `info ...` lines into structured records and groups
//! them into "candidate snapshots" — all multi-PV lines observed at the
//! same node count. See `spec.md` section 4.8.

/// One parsed `info` line. `score_cp` and `mate` are mutually exclusive;
/// whichever wasn't reported by this line is left at 0, matching the
/// "0 = none" convention `spec.md` uses for mate distance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfoRecord {
    pub depth: u32,
    pub seldepth: u32,
    pub multipv: u32,
    pub score_cp: i64,
    pub mate: i64,
    pub nodes: u64,
    pub nps: u64,
    pub hashfull: u32,
    pub tbhits: u64,
    pub time_ms: u64,
    pub pv: String,
    /// The unparsed backend line this record came from. Kept so a flushed
    /// snapshot can be forwarded to the host verbatim (`spec.md` section
    /// 4.8), rather than re-rendered from the parsed fields.
    pub raw: String,
}

fn next_parsed<'a, T: std::str::FromStr>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<T> {
    tokens.next()?.parse().ok()
}

/// Parses one backend stdout line. Returns `None` for `info string ...`
/// lines, non-`info` lines, and any line whose PV field ends up empty —
/// per `spec.md` section 4.8 a record is only admitted once it carries a
/// PV.
#[must_use]
pub fn parse_info_line(line: &str) -> Option<InfoRecord> {
    let mut tokens = line.split_whitespace().peekable();
    if tokens.next()? != "info" {
        return None;
    }
    if tokens.peek() == Some(&"string") {
        return None;
    }

    let mut record = InfoRecord { raw: line.to_string(), ..InfoRecord::default() };
    while let Some(token) = tokens.next() {
        match token {
            "depth" => record.depth = next_parsed(&mut tokens)?,
            "seldepth" => record.seldepth = next_parsed(&mut tokens)?,
            "multipv" => record.multipv = next_parsed(&mut tokens)?,
            "nodes" => record.nodes = next_parsed(&mut tokens)?,
            "nps" => record.nps = next_parsed(&mut tokens)?,
            "hashfull" => record.hashfull = next_parsed(&mut tokens)?,
            "tbhits" => record.tbhits = next_parsed(&mut tokens)?,
            "time" => record.time_ms = next_parsed(&mut tokens)?,
            "score" => {
                match tokens.next() {
                    Some("cp") => record.score_cp = next_parsed(&mut tokens)?,
                    Some("mate") => record.mate = next_parsed(&mut tokens)?,
                    _ => {},
                }
                if matches!(tokens.peek(), Some(&"lowerbound") | Some(&"upperbound")) {
                    tokens.next();
                }
            },
            "currmove" | "currmovenumber" => {
                tokens.next();
            },
            "pv" => {
                record.pv = tokens.by_ref().collect::<Vec<_>>().join(" ");
                break;
            },
            _ => {},
        }
    }

    if record.pv.is_empty() { None } else { Some(record) }
}

/// Groups incoming records by node count into the "current snapshot",
/// flushing the previous one to the host when appropriate.
#[derive(Default)]
pub struct SnapshotBuffer {
    current_nodes: Option<u64>,
    records: Vec<InfoRecord>,
    flushed: bool,
}

impl SnapshotBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a newly parsed record. If its node count differs from the
    /// buffer's current one, the old snapshot is closed out: if it was
    /// never flushed and this record's `time` is at least 10ms past the
    /// old snapshot's last-seen `time`, the old snapshot is returned so
    /// the caller can forward it to the host before it's discarded.
    pub fn push(&mut self, record: InfoRecord) -> Option<Vec<InfoRecord>> {
        if self.current_nodes == Some(record.nodes) {
            self.records.push(record);
            return None;
        }

        let flushed_out = match (self.current_nodes, self.records.last()) {
            (Some(_), Some(last)) if !self.flushed && record.time_ms >= last.time_ms + 10 => {
                Some(std::mem::take(&mut self.records))
            },
            _ => None,
        };

        self.current_nodes = Some(record.nodes);
        self.records = vec![record];
        self.flushed = false;
        flushed_out
    }

    /// Returns the current snapshot's records, in arrival order.
    #[must_use]
    pub fn records(&self) -> &[InfoRecord] {
        &self.records
    }

    /// The multi-PV-1 line, if any have arrived yet for this snapshot.
    #[must_use]
    pub fn first(&self) -> Option<&InfoRecord> {
        self.records.first()
    }

    /// Whether any `info` lines have arrived for the current snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Marks the current snapshot as flushed and returns its records, if
    /// it wasn't already flushed and isn't empty. Used by the bestmove
    /// handler, which must forward the in-flight snapshot before
    /// resetting the buffer.
    pub fn flush_if_unflushed(&mut self) -> Option<Vec<InfoRecord>> {
        if self.flushed || self.records.is_empty() {
            return None;
        }
        self.flushed = true;
        Some(self.records.clone())
    }

    /// Clears the buffer entirely, ready for the next search.
    pub fn reset(&mut self) {
        self.current_nodes = None;
        self.records.clear();
        self.flushed = false;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_all_known_keys_in_any_order() {
        let line = "info multipv 1 score cp 34 nodes 120000 nps 800000 hashfull 123 tbhits 0 time 250 seldepth 18 depth 14 pv e2e4 e7e5";
        let record = parse_info_line(line).unwrap();
        assert_eq!(record.depth, 14);
        assert_eq!(record.seldepth, 18);
        assert_eq!(record.multipv, 1);
        assert_eq!(record.score_cp, 34);
        assert_eq!(record.mate, 0);
        assert_eq!(record.nodes, 120_000);
        assert_eq!(record.nps, 800_000);
        assert_eq!(record.hashfull, 123);
        assert_eq!(record.tbhits, 0);
        assert_eq!(record.time_ms, 250);
        assert_eq!(record.pv, "e2e4 e7e5");
    }

    #[test]
    fn score_mate_leaves_cp_at_zero() {
        let record = parse_info_line("info depth 20 score mate 3 nodes 1 time 1 pv g1f3").unwrap();
        assert_eq!(record.mate, 3);
        assert_eq!(record.score_cp, 0);
    }

    #[test]
    fn tolerates_bound_trailer() {
        let record =
            parse_info_line("info depth 20 score cp 15 lowerbound nodes 1 time 1 pv e2e4").unwrap();
        assert_eq!(record.score_cp, 15);
    }

    #[test]
    fn info_string_is_ignored() {
        assert_eq!(parse_info_line("info string NNUE evaluation enabled"), None);
    }

    #[test]
    fn record_without_pv_is_not_admitted() {
        assert_eq!(parse_info_line("info depth 20 nodes 1 time 1"), None);
    }

    #[test]
    fn snapshot_grouping_flushes_groups_of_k() {
        let mut buffer = SnapshotBuffer::new();
        let make = |nodes: u64, time_ms: u64| InfoRecord {
            nodes,
            time_ms,
            pv: "e2e4".to_string(),
            ..Default::default()
        };

        assert!(buffer.push(make(100, 0)).is_none());
        assert!(buffer.push(make(100, 5)).is_none());
        let flushed = buffer.push(make(200, 20)).unwrap();
        assert_eq!(flushed.len(), 2);
        assert_eq!(buffer.records().len(), 1);
    }

    #[test]
    fn stale_snapshot_within_10ms_is_not_flushed() {
        let mut buffer = SnapshotBuffer::new();
        let make = |nodes: u64, time_ms: u64| InfoRecord {
            nodes,
            time_ms,
            pv: "e2e4".to_string(),
            ..Default::default()
        };
        buffer.push(make(100, 0));
        assert!(buffer.push(make(200, 5)).is_none());
    }
}
