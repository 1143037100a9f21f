//! Canonical gate sets and the alias tables they are built from.

use rustc_hash::FxHashMap;
use std::f64::consts::PI;

use qbridge_ir::StandardGate;
use qbridge_pattern::Kind;

use crate::error::{ConvertError, ConvertResult};

/// Source name of the measurement instruction.
pub const MEASURE: &str = "measure";

/// How a source angle becomes a target angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgTransform {
    Identity,
    /// Multiply by a constant. A negative factor flips the sign.
    Scale(f64),
}

impl ArgTransform {
    /// Radians to half-turns.
    pub fn half_turns() -> Self {
        ArgTransform::Scale(1.0 / PI)
    }

    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            ArgTransform::Identity => value,
            ArgTransform::Scale(factor) => value * factor,
        }
    }
}

/// One row of an alias table: a source name, the target kind it becomes and
/// the angle transform applied on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct GateAlias {
    pub source: String,
    pub target: Kind,
    pub transform: ArgTransform,
}

impl GateAlias {
    pub fn new(source: impl Into<String>, target: Kind) -> Self {
        Self {
            source: source.into(),
            target,
            transform: ArgTransform::Identity,
        }
    }

    pub fn with_transform(mut self, transform: ArgTransform) -> Self {
        self.transform = transform;
        self
    }
}

/// The closed set of instruction kinds both frameworks can express.
///
/// Built once from an alias table and never mutated. Share it through an
/// `Arc`; several sets may coexist.
#[derive(Debug, Clone)]
pub struct CanonicalGateSet {
    aliases: Vec<GateAlias>,
    by_source: FxHashMap<String, usize>,
}

impl CanonicalGateSet {
    /// Build a set from an alias table.
    ///
    /// Every source name must be a library gate spelled the way the emitter
    /// writes it (or `measure`), appear once, and agree with its target kind
    /// on qubit and angle counts.
    pub fn new(aliases: impl IntoIterator<Item = GateAlias>) -> ConvertResult<Self> {
        let aliases: Vec<GateAlias> = aliases.into_iter().collect();
        let mut by_source = FxHashMap::default();

        for (index, alias) in aliases.iter().enumerate() {
            check_alias(alias)?;
            if by_source.insert(alias.source.clone(), index).is_some() {
                return Err(ConvertError::InvalidGateSet(format!(
                    "'{}' is aliased twice",
                    alias.source
                )));
            }
        }

        Ok(Self { aliases, by_source })
    }

    /// The standard table shared by the two frameworks.
    ///
    /// `crz` is the only entry with a non-identity transform: the target's
    /// `RZZ` takes its angle in half-turns.
    pub fn standard() -> Self {
        let aliases = vec![
            GateAlias::new("id", Kind::I),
            GateAlias::new("x", Kind::X),
            GateAlias::new("y", Kind::Y),
            GateAlias::new("z", Kind::Z),
            GateAlias::new("h", Kind::H),
            GateAlias::new("s", Kind::S),
            GateAlias::new("rx", Kind::Rx),
            GateAlias::new("ry", Kind::Ry),
            GateAlias::new("rz", Kind::Rz),
            GateAlias::new("cx", Kind::Cnot),
            GateAlias::new("cz", Kind::Cz),
            GateAlias::new("crz", Kind::Rzz).with_transform(ArgTransform::half_turns()),
            GateAlias::new("swap", Kind::Swap),
            GateAlias::new("ccx", Kind::Ccx),
            GateAlias::new(MEASURE, Kind::M),
        ];
        let by_source = aliases
            .iter()
            .enumerate()
            .map(|(i, a)| (a.source.clone(), i))
            .collect();
        Self { aliases, by_source }
    }

    /// A subset of this set keeping only the named source entries.
    pub fn restrict(&self, names: &[&str]) -> ConvertResult<Self> {
        let mut kept = Vec::with_capacity(names.len());
        for name in names {
            let alias = self.lookup(name).ok_or_else(|| {
                ConvertError::InvalidGateSet(format!("'{name}' is not in the parent set"))
            })?;
            kept.push(alias.clone());
        }
        Self::new(kept)
    }

    pub fn lookup(&self, source: &str) -> Option<&GateAlias> {
        self.by_source.get(source).map(|&i| &self.aliases[i])
    }

    pub fn contains(&self, source: &str) -> bool {
        self.by_source.contains_key(source)
    }

    /// Source names in table order, as handed to a decomposer.
    pub fn basis_names(&self) -> Vec<&str> {
        self.aliases.iter().map(|a| a.source.as_str()).collect()
    }

    pub fn aliases(&self) -> &[GateAlias] {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for CanonicalGateSet {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_alias(alias: &GateAlias) -> ConvertResult<()> {
    let kind = alias.target;
    if alias.source == MEASURE {
        return if kind == Kind::M {
            Ok(())
        } else {
            Err(ConvertError::InvalidGateSet(format!(
                "'{MEASURE}' must map to M, not {kind}"
            )))
        };
    }
    if kind == Kind::M {
        return Err(ConvertError::InvalidGateSet(format!(
            "only '{MEASURE}' may map to M, not '{}'",
            alias.source
        )));
    }

    let (qubits, params) = StandardGate::signature(&alias.source)
        .filter(|_| emitted_spelling(&alias.source))
        .ok_or_else(|| {
            ConvertError::InvalidGateSet(format!("'{}' is not a library gate", alias.source))
        })?;
    if qubits as usize != kind.num_qubits() || params != kind.num_params() {
        return Err(ConvertError::InvalidGateSet(format!(
            "'{}' ({qubits} qubits, {params} angles) does not fit {kind}",
            alias.source
        )));
    }
    Ok(())
}

/// Aliases such as `cnot` parse, but documents only ever carry the primary name.
fn emitted_spelling(name: &str) -> bool {
    StandardGate::signature(name)
        .and_then(|(_, params)| StandardGate::from_name(name, &[0.0; 3][..params]))
        .is_some_and(|gate| gate.name() == name)
}
