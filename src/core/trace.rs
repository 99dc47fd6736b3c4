use core::diag::{Category, Diagnostic, ErrorSink};

lazy_static! {
    static ref KNOWN_OPTIONS: Vec<&'static str> =
        vec!["fixpoint", "sets", "graph", "symbols", "xref", "stats"];
}

/// Debug and trace toggles, settable by name before a run. Unrecognized
/// names are reported as non-fatal warnings and otherwise ignored.
#[derive(Clone, Debug)]
pub struct TraceOptions {
    pub fixpoint: bool,
    pub sets: bool,
    pub graph: bool,
    pub symbols: bool,
    pub xref: bool,
    pub stats: bool,
}

impl TraceOptions {
    pub fn new() -> TraceOptions {
        TraceOptions {
            fixpoint: false,
            sets: false,
            graph: false,
            symbols: false,
            xref: false,
            stats: false,
        }
    }

    pub fn set(&mut self, name: &str, sink: &mut dyn ErrorSink) -> bool {
        match name {
            "fixpoint" => self.fixpoint = true,
            "sets" => self.sets = true,
            "graph" => self.graph = true,
            "symbols" => self.symbols = true,
            "xref" => self.xref = true,
            "stats" => self.stats = true,
            _ => {
                sink.report(Diagnostic::warning(
                    Category::UnknownTraceOption,
                    0,
                    format!(
                        "unknown trace option '{}' (known: {})",
                        name,
                        KNOWN_OPTIONS.join(", ")
                    ),
                ));
                return false;
            }
        }
        true
    }

    pub fn known() -> &'static [&'static str] {
        &KNOWN_OPTIONS
    }
}

/// Wall-clock timings of the analysis passes, in milliseconds. Filled by
/// the set-computation engine, rendered by the statistics listing.
#[derive(Clone, Debug, Default)]
pub struct PassTimings {
    pub deletability_ms: i64,
    pub first_ms: i64,
    pub follow_ms: i64,
    pub any_ms: i64,
    pub sync_ms: i64,
    /// Iterations until the deletability fixpoint converged; bounded by
    /// the symbol count.
    pub deletability_iterations: usize,
}

impl PassTimings {
    pub fn new() -> PassTimings {
        PassTimings::default()
    }

    pub fn total_ms(&self) -> i64 {
        self.deletability_ms + self.first_ms + self.follow_ms + self.any_ms + self.sync_ms
    }
}
