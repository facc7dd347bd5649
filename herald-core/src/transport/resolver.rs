//! Transport resolution from DSN strings
//!
//! Factories are consulted in registration order and the first one that
//! claims a DSN builds the transport. The default list is fixed and ends
//! with the catch-all null factory.
//!
//! Combined strings use a flat two-pass split: `" || "` (failover) is tried
//! first, then `" && "` (round-robin). Combinators cannot be nested in one
//! string; a failover segment containing `" && "` is rejected.

use super::{
    FailoverTransport, NullTransportFactory, RoundRobinTransport, Transport, TransportContext,
    TransportFactory, Transports,
};
use crate::bridges;
use crate::dsn::Dsn;
use crate::error::{NotifierError, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static FAILOVER_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\|\|\s+").expect("failover delimiter regex"));
static ROUND_ROBIN_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+&&\s+").expect("round-robin delimiter regex"));

/// Shape of a DSN string once combinators are split off
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DsnLayout {
    Single(Dsn),
    Failover(Vec<Dsn>),
    RoundRobin(Vec<Dsn>),
}

impl DsnLayout {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();

        let segments: Vec<&str> = FAILOVER_DELIMITER.split(raw).collect();
        if segments.len() > 1 {
            if segments.iter().any(|s| ROUND_ROBIN_DELIMITER.is_match(s)) {
                return Err(NotifierError::malformed(
                    "\" && \" cannot be nested inside a \" || \" failover list",
                ));
            }
            return Ok(DsnLayout::Failover(parse_segments(&segments)?));
        }

        let segments: Vec<&str> = ROUND_ROBIN_DELIMITER.split(raw).collect();
        if segments.len() > 1 {
            return Ok(DsnLayout::RoundRobin(parse_segments(&segments)?));
        }

        Ok(DsnLayout::Single(Dsn::parse(raw)?))
    }

    pub fn dsns(&self) -> &[Dsn] {
        match self {
            DsnLayout::Single(dsn) => std::slice::from_ref(dsn),
            DsnLayout::Failover(dsns) | DsnLayout::RoundRobin(dsns) => dsns,
        }
    }
}

fn parse_segments(segments: &[&str]) -> Result<Vec<Dsn>> {
    segments.iter().map(|s| Dsn::parse(s)).collect()
}

/// Ordered factory registry
#[derive(Default)]
pub struct TransportResolver {
    factories: Vec<Box<dyn TransportFactory>>,
}

impl TransportResolver {
    pub fn new(factories: Vec<Box<dyn TransportFactory>>) -> Self {
        Self { factories }
    }

    /// Default bridges followed by the null factory
    pub fn with_defaults(context: TransportContext) -> Self {
        let mut resolver = Self::without_null(context.clone());
        resolver.register(Box::new(NullTransportFactory::new(context)));
        resolver
    }

    /// Default bridges only; unknown schemes fail with `UnsupportedScheme`
    pub fn without_null(context: TransportContext) -> Self {
        Self::new(bridges::default_factories(&context))
    }

    /// Append a factory; it has lower priority than every factory already registered
    pub fn register(&mut self, factory: Box<dyn TransportFactory>) -> &mut Self {
        self.factories.push(factory);
        self
    }

    /// Schemes of every registered factory, in priority order
    pub fn supported_schemes(&self) -> Vec<String> {
        self.factories
            .iter()
            .flat_map(|f| f.schemes().iter().map(|s| s.to_string()))
            .collect()
    }

    /// Resolve one parsed DSN with the first factory that claims it
    pub fn resolve(&self, dsn: &Dsn) -> Result<Box<dyn Transport>> {
        for (priority, factory) in self.factories.iter().enumerate() {
            if factory.supports(dsn) {
                debug!(
                    dsn = %dsn,
                    priority,
                    factory = %factory.schemes().join(","),
                    "Resolved transport factory"
                );
                return factory.create(dsn);
            }
        }

        Err(NotifierError::UnsupportedScheme {
            scheme: dsn.scheme().to_string(),
            supported: self.supported_schemes(),
        })
    }

    /// Resolve a DSN string, honouring `||` and `&&` combinators
    pub fn resolve_string(&self, raw: &str) -> Result<Box<dyn Transport>> {
        self.resolve_layout(&DsnLayout::parse(raw)?)
    }

    pub fn resolve_layout(&self, layout: &DsnLayout) -> Result<Box<dyn Transport>> {
        match layout {
            DsnLayout::Single(dsn) => self.resolve(dsn),
            DsnLayout::Failover(_) => Ok(Box::new(FailoverTransport::new(
                self.resolve_all(layout.dsns())?,
            )?)),
            DsnLayout::RoundRobin(_) => Ok(Box::new(RoundRobinTransport::new(
                self.resolve_all(layout.dsns())?,
            )?)),
        }
    }

    /// Resolve each named DSN string independently
    pub fn resolve_named<I, K, V>(&self, dsns: I) -> Result<Transports>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut transports = Transports::new();
        for (name, dsn) in dsns {
            let transport = self.resolve_string(dsn.as_ref())?;
            transports.insert(name, transport);
        }
        Ok(transports)
    }

    fn resolve_all(&self, dsns: &[Dsn]) -> Result<Vec<Box<dyn Transport>>> {
        dsns.iter().map(|dsn| self.resolve(dsn)).collect()
    }
}
