//! Orchestration: scan, fan out, collect.
//!
//! A run goes through these steps:
//!
//! 1. build the symbol table from every source unit
//! 2. scan for candidates and sort them by identity
//! 3. reserve a hint per candidate in that order
//! 4. parse, validate and emit every candidate on the rayon pool
//! 5. drop later clients whose name collides within a module
//! 6. sort units by hint and offer them to the debug sink
//!
//! Steps 2 and 3 are sequential so hints never depend on scheduling. Each
//! worker only reads the symbol table, its own candidate and the config.
//! The name cache was filled before the fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn};

use crate::codegen::{EmitContext, GeneratedUnit, generate_client, generate_serializer, render_unit};
use crate::config::GeneratorConfig;
use crate::debug::{DebugSink, DirectorySink};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::errors::GeneratorError;
use crate::ir::QualifiedName;
use crate::naming::NameCache;
use crate::parser::{parse_client, parse_enumeration};
use crate::scanner::{Candidate, CandidateKind, scan};
use crate::source::SourceUnit;
use crate::symbols::SymbolTable;
use crate::validation::{validate_client, validate_enumeration};

/// Everything one run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    /// Emitted units, sorted by hint.
    pub units: Vec<GeneratedUnit>,
    /// Scan diagnostics first, then per declaration in hint order.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the run was cancelled before every declaration was processed.
    pub cancelled: bool,
}

impl GenerationReport {
    /// Looks up a unit by hint.
    pub fn unit(&self, hint: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|unit| unit.hint == hint)
    }
}

/// Runs the generation pipeline over parsed source units.
#[derive(Clone)]
pub struct Generator {
    config: GeneratorConfig,
    names: Arc<NameCache>,
    sink: Option<Arc<dyn DebugSink>>,
    cancellation: CancellationToken,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("names", &self.names.len())
            .field("sink", &self.sink.is_some())
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

impl Generator {
    /// Creates a generator using the process-wide name cache.
    ///
    /// A `debug.dump_dir` in the config installs a [`DirectorySink`].
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` if the config is invalid.
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        let sink = config
            .debug
            .dump_dir
            .as_ref()
            .map(|dir| Arc::new(DirectorySink::new(dir)) as Arc<dyn DebugSink>);
        Ok(Self {
            config,
            names: NameCache::global(),
            sink,
            cancellation: CancellationToken::new(),
        })
    }

    /// Uses `names` instead of the process-wide cache.
    pub fn with_name_cache(mut self, names: Arc<NameCache>) -> Self {
        self.names = names;
        self
    }

    /// Replaces the debug sink.
    pub fn with_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Checks `token` before each declaration.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates every declaration found in `units`.
    ///
    /// Per-declaration problems end up in the report's diagnostics. If the
    /// cancellation token fires, declarations already started are finished,
    /// the rest are skipped and the report is flagged `cancelled`.
    ///
    /// ## Errors
    ///
    /// Returns a `GeneratorError` if a candidate cannot be re-parsed or
    /// emitted code does not parse.
    pub fn generate(&self, units: &[SourceUnit]) -> Result<GenerationReport, GeneratorError> {
        let _run = info_span!("generate", files = units.len()).entered();

        let symbols = SymbolTable::build(units);
        let mut scanned = scan(units);
        scanned
            .candidates
            .sort_by(|a, b| (&a.identity, a.kind).cmp(&(&b.identity, b.kind)));

        let jobs: Vec<(String, Candidate)> = scanned
            .candidates
            .into_iter()
            .map(|candidate| (self.names.reserve(&candidate.identity, candidate.kind), candidate))
            .collect();
        info!(
            candidates = jobs.len(),
            structs = symbols.len(),
            "scanned declarations"
        );

        let results: Vec<Option<Result<Processed, GeneratorError>>> = jobs
            .par_iter()
            .map(|(hint, candidate)| {
                if self.cancellation.is_cancelled() {
                    debug!(identity = %candidate.identity, "skipped after cancellation");
                    return None;
                }
                Some(self.process(hint, candidate, &symbols))
            })
            .collect();

        let mut report = GenerationReport {
            diagnostics: scanned.diagnostics,
            ..GenerationReport::default()
        };
        let mut processed = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Some(result) => processed.push(result?),
                None => report.cancelled = true,
            }
        }
        processed.sort_by(|a, b| a.hint.cmp(&b.hint));

        let mut client_names: HashMap<(Vec<String>, String), QualifiedName> = HashMap::new();
        for item in processed {
            report.diagnostics.extend(item.diagnostics);
            let Some(unit) = item.unit else {
                continue;
            };
            if let Some(name) = item.client_name {
                let key = (unit.source.module.clone(), name.clone());
                if let Some(owner) = client_names.get(&key) {
                    report.diagnostics.push(Diagnostic::declaration(
                        &unit.source,
                        DiagnosticKind::ClientNameCollision {
                            name,
                            owner: owner.to_string(),
                        },
                    ));
                    continue;
                }
                client_names.insert(key, unit.source.clone());
            }
            report.units.push(unit);
        }

        for diagnostic in &report.diagnostics {
            warn!(
                subject = %diagnostic.subject,
                member = diagnostic.member.as_deref().unwrap_or(""),
                "{}",
                diagnostic.kind
            );
        }
        if let Some(sink) = &self.sink {
            for unit in &report.units {
                sink.offer(unit);
            }
        }

        info!(
            units = report.units.len(),
            diagnostics = report.diagnostics.len(),
            cancelled = report.cancelled,
            "generation finished"
        );
        Ok(report)
    }

    fn process(
        &self,
        hint: &str,
        candidate: &Candidate,
        symbols: &SymbolTable,
    ) -> Result<Processed, GeneratorError> {
        // Token types are thread-bound, so each worker builds its own context.
        let ctx = &EmitContext::from_config(&self.config);
        let _span = info_span!(
            "declaration",
            identity = %candidate.identity,
            kind = candidate.kind.hint_suffix()
        )
        .entered();

        let mut processed = Processed {
            hint: hint.to_string(),
            unit: None,
            client_name: None,
            diagnostics: Vec::new(),
        };

        match candidate.kind {
            CandidateKind::Client => {
                let parsed = parse_client(candidate, symbols, &self.config)?;
                processed.diagnostics = parsed.diagnostics;
                let Some(definition) = parsed.definition else {
                    return Ok(processed);
                };
                let (definition, diagnostics) = validate_client(definition);
                processed.diagnostics.extend(diagnostics);

                let tokens = generate_client(&definition, ctx);
                processed.unit = Some(render_unit(
                    tokens,
                    processed.hint.clone(),
                    candidate.kind,
                    &candidate.identity,
                )?);
                processed.client_name = Some(definition.client_name.to_string());
            }
            CandidateKind::Serializer => {
                let parsed = parse_enumeration(candidate)?;
                processed.diagnostics = parsed.diagnostics;
                let Some(enumeration) = parsed.definition else {
                    return Ok(processed);
                };
                if let Err(diagnostics) = validate_enumeration(&enumeration) {
                    processed.diagnostics.extend(diagnostics);
                    return Ok(processed);
                }

                let tokens = generate_serializer(&enumeration, ctx);
                processed.unit = Some(render_unit(
                    tokens,
                    processed.hint.clone(),
                    candidate.kind,
                    &candidate.identity,
                )?);
            }
        }

        debug!(hint, "declaration processed");
        Ok(processed)
    }
}

/// One declaration's result before collection.
struct Processed {
    hint: String,
    unit: Option<GeneratedUnit>,
    client_name: Option<String>,
    diagnostics: Vec<Diagnostic>,
}
