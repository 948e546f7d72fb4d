use crate::error::{CalcError, CalcResult};
use log::debug;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterestMode {
    #[default]
    Simple,
    Compound,
}

impl InterestMode {
    /// The unknown selected after switching to this mode.
    pub fn default_unknown(self) -> FieldKey {
        match self {
            InterestMode::Simple => FieldKey::Interest,
            InterestMode::Compound => FieldKey::Amount,
        }
    }
}

impl fmt::Display for InterestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterestMode::Simple => write!(f, "simple"),
            InterestMode::Compound => write!(f, "compound"),
        }
    }
}

/// The six variables of the interest equations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKey {
    /// C, the principal
    Principal,
    /// i, the nominal annual rate as a percentage
    Rate,
    /// n, the term in years
    Periods,
    /// m, compounding events per year
    Frequency,
    /// M, principal plus accrued interest
    Amount,
    /// I, accrued interest
    Interest,
}

impl FieldKey {
    pub const ALL: [FieldKey; 6] = [
        FieldKey::Principal,
        FieldKey::Rate,
        FieldKey::Periods,
        FieldKey::Frequency,
        FieldKey::Amount,
        FieldKey::Interest,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            FieldKey::Principal => "C",
            FieldKey::Rate => "i",
            FieldKey::Periods => "n",
            FieldKey::Frequency => "m",
            FieldKey::Amount => "M",
            FieldKey::Interest => "I",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Raw input values. `None` means the field was left empty.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fields {
    pub principal: Option<f64>,
    pub rate: Option<f64>,
    pub periods: Option<f64>,
    pub frequency: Option<f64>,
    pub amount: Option<f64>,
    pub interest: Option<f64>,
}

impl Fields {
    /// Default inputs loaded when a mode is selected.
    pub fn defaults(mode: InterestMode) -> Self {
        match mode {
            InterestMode::Simple => Self {
                principal: Some(10000.),
                rate: Some(5.),
                periods: Some(3.),
                frequency: Some(1.),
                amount: None,
                interest: None,
            },
            InterestMode::Compound => Self {
                principal: Some(10000.),
                rate: Some(8.),
                periods: Some(2.),
                frequency: Some(12.),
                amount: None,
                interest: None,
            },
        }
    }

    pub fn get(&self, key: FieldKey) -> Option<f64> {
        match key {
            FieldKey::Principal => self.principal,
            FieldKey::Rate => self.rate,
            FieldKey::Periods => self.periods,
            FieldKey::Frequency => self.frequency,
            FieldKey::Amount => self.amount,
            FieldKey::Interest => self.interest,
        }
    }

    pub fn set(&mut self, key: FieldKey, value: Option<f64>) {
        let slot = match key {
            FieldKey::Principal => &mut self.principal,
            FieldKey::Rate => &mut self.rate,
            FieldKey::Periods => &mut self.periods,
            FieldKey::Frequency => &mut self.frequency,
            FieldKey::Amount => &mut self.amount,
            FieldKey::Interest => &mut self.interest,
        };
        *slot = value;
    }

    pub fn with(mut self, key: FieldKey, value: f64) -> Self {
        self.set(key, Some(value));
        self
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Solved value; rates are percentages and terms are years.
    pub value: f64,
    /// Substituted formula ending in the value to 2 decimals.
    pub detail: String,
}

/// Calculator state: a mode, the field values and at most one selected unknown.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterestCalculator {
    mode: InterestMode,
    fields: Fields,
    unknown: Option<FieldKey>,
}

impl Default for InterestCalculator {
    fn default() -> Self {
        Self::new(InterestMode::Simple)
    }
}

impl InterestCalculator {
    pub fn new(mode: InterestMode) -> Self {
        Self {
            mode,
            fields: Fields::defaults(mode),
            unknown: Some(mode.default_unknown()),
        }
    }

    pub fn mode(&self) -> InterestMode {
        self.mode
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn unknown(&self) -> Option<FieldKey> {
        self.unknown
    }

    /// Switching mode discards every value and reloads the mode defaults.
    pub fn set_mode(&mut self, mode: InterestMode) {
        *self = Self::new(mode);
    }

    pub fn select_unknown(&mut self, key: FieldKey) {
        self.unknown = Some(key);
    }

    pub fn clear_unknown(&mut self) {
        self.unknown = None;
    }

    pub fn get(&self, key: FieldKey) -> Option<f64> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: FieldKey, value: Option<f64>) {
        self.fields.set(key, value);
    }

    /// Formula text for the current mode and unknown.
    pub fn formula(&self) -> Option<&'static str> {
        let unknown = self.unknown?;
        let text = match (self.mode, unknown) {
            (_, FieldKey::Frequency) => return None,
            (InterestMode::Simple, FieldKey::Principal) => {
                "C = I / (i × n)  or  C = M / (1 + i × n)"
            }
            (InterestMode::Simple, FieldKey::Rate) => "i = I / (C × n)  or  i = (M/C - 1) / n",
            (InterestMode::Simple, FieldKey::Periods) => "n = I / (C × i)  or  n = (M/C - 1) / i",
            (InterestMode::Simple, FieldKey::Interest) => "I = C × i × n",
            (InterestMode::Simple, FieldKey::Amount) => "M = C × (1 + i × n)",
            (InterestMode::Compound, FieldKey::Principal) => "C = M / (1 + i/m)^(n×m)",
            (InterestMode::Compound, FieldKey::Rate) => "i = m × ((M/C)^(1/(n×m)) - 1)",
            (InterestMode::Compound, FieldKey::Periods) => "n = ln(M/C) / (m × ln(1 + i/m))",
            (InterestMode::Compound, FieldKey::Amount) => "M = C × (1 + i/m)^(n×m)",
            (InterestMode::Compound, FieldKey::Interest) => {
                "I = M - C,  where  M = C × (1 + i/m)^(n×m)"
            }
        };
        Some(text)
    }

    pub fn calculate(&self) -> CalcResult<Solution> {
        solve_interest(self.mode, &self.fields, self.unknown)
    }
}

/// Solve for `unknown` from the remaining fields.
///
/// Inputs are validated before any arithmetic. Where two formulas apply, the first
/// derivation in the mode's table whose inputs are all supplied is used, so an
/// I-based formula wins over the M-based one.
pub fn solve_interest(
    mode: InterestMode,
    fields: &Fields,
    unknown: Option<FieldKey>,
) -> CalcResult<Solution> {
    let unknown = unknown.ok_or(CalcError::MissingUnknown)?;
    if unknown == FieldKey::Frequency {
        return Err(CalcError::Domain(
            "m has no closed-form solution; select another unknown".into(),
        ));
    }

    let known = Known { fields, unknown };
    match mode {
        InterestMode::Simple => validate_simple(&known)?,
        InterestMode::Compound => validate_compound(&known)?,
    }

    let table = match mode {
        InterestMode::Simple => SIMPLE,
        InterestMode::Compound => COMPOUND,
    };
    let derivation = table
        .iter()
        .filter(|d| d.solves == unknown)
        .find(|d| d.requires.iter().all(|&k| known.positive(k).is_some()))
        .ok_or_else(|| {
            CalcError::InsufficientInputs(format!(
                "no {mode} interest formula for {unknown} matches the supplied values"
            ))
        })?;

    let solution = (derivation.solve)(&Inputs::from(fields));
    debug!("{mode} interest: {}", solution.detail.replace('\n', "; "));

    if !solution.value.is_finite() {
        return Err(CalcError::Domain(format!(
            "{unknown} does not evaluate to a finite number for these inputs"
        )));
    }
    Ok(solution)
}

/// View of the fields with the unknown masked out.
struct Known<'a> {
    fields: &'a Fields,
    unknown: FieldKey,
}

impl Known<'_> {
    fn positive(&self, key: FieldKey) -> Option<f64> {
        if key == self.unknown {
            return None;
        }
        self.fields
            .get(key)
            .filter(|v| v.is_finite() && *v > 0.)
    }

    fn require(&self, key: FieldKey) -> CalcResult<f64> {
        self.positive(key)
            .ok_or_else(|| CalcError::invalid(key.symbol()))
    }
}

fn validate_simple(known: &Known) -> CalcResult<()> {
    let base = [FieldKey::Principal, FieldKey::Rate, FieldKey::Periods];
    let solving_total = matches!(known.unknown, FieldKey::Interest | FieldKey::Amount);

    if solving_total {
        let missing: Vec<&str> = base
            .iter()
            .filter(|&&k| known.fields.get(k).is_none())
            .map(|k| k.symbol())
            .collect();
        if !missing.is_empty() {
            return Err(CalcError::InsufficientInputs(format!(
                "C, i and n are required to solve for {}; missing {}",
                known.unknown,
                missing.join(", ")
            )));
        }
    }

    for key in base.into_iter().filter(|&k| k != known.unknown) {
        known.require(key)?;
    }

    if !solving_total
        && known.positive(FieldKey::Interest).is_none()
        && known.positive(FieldKey::Amount).is_none()
    {
        return Err(CalcError::InsufficientInputs(format!(
            "I or M is required to solve for {}",
            known.unknown
        )));
    }
    Ok(())
}

fn validate_compound(known: &Known) -> CalcResult<()> {
    let base = [
        FieldKey::Principal,
        FieldKey::Rate,
        FieldKey::Periods,
        FieldKey::Frequency,
    ];
    for key in base.into_iter().filter(|&k| k != known.unknown) {
        known.require(key)?;
    }

    if known.unknown == FieldKey::Principal
        && known.positive(FieldKey::Amount).is_none()
        && known.positive(FieldKey::Interest).is_some()
    {
        return Err(CalcError::Domain(
            "M (final amount) is required to solve for C under compound interest".into(),
        ));
    }

    let supplied = base
        .iter()
        .chain([FieldKey::Amount].iter())
        .filter(|&&k| known.positive(k).is_some())
        .count();
    if supplied < 4 {
        return Err(CalcError::InsufficientInputs(
            "at least 4 of C, i, n, m and M are required for compound interest".into(),
        ));
    }
    Ok(())
}

/// Field values as used by the formulas; the rate is kept both as entered and as a decimal.
struct Inputs {
    c: f64,
    pct: f64,
    i: f64,
    n: f64,
    m: f64,
    amount: f64,
    interest: f64,
}

impl From<&Fields> for Inputs {
    fn from(fields: &Fields) -> Self {
        let pct = fields.rate.unwrap_or(0.);
        Self {
            c: fields.principal.unwrap_or(0.),
            pct,
            i: pct / 100.,
            n: fields.periods.unwrap_or(0.),
            m: fields.frequency.unwrap_or(1.),
            amount: fields.amount.unwrap_or(0.),
            interest: fields.interest.unwrap_or(0.),
        }
    }
}

struct Derivation {
    solves: FieldKey,
    requires: &'static [FieldKey],
    solve: fn(&Inputs) -> Solution,
}

const SIMPLE: &[Derivation] = &[
    Derivation {
        solves: FieldKey::Principal,
        requires: &[FieldKey::Rate, FieldKey::Periods, FieldKey::Interest],
        solve: simple_principal_from_interest,
    },
    Derivation {
        solves: FieldKey::Principal,
        requires: &[FieldKey::Rate, FieldKey::Periods, FieldKey::Amount],
        solve: simple_principal_from_amount,
    },
    Derivation {
        solves: FieldKey::Rate,
        requires: &[FieldKey::Principal, FieldKey::Periods, FieldKey::Interest],
        solve: simple_rate_from_interest,
    },
    Derivation {
        solves: FieldKey::Rate,
        requires: &[FieldKey::Principal, FieldKey::Periods, FieldKey::Amount],
        solve: simple_rate_from_amount,
    },
    Derivation {
        solves: FieldKey::Periods,
        requires: &[FieldKey::Principal, FieldKey::Rate, FieldKey::Interest],
        solve: simple_periods_from_interest,
    },
    Derivation {
        solves: FieldKey::Periods,
        requires: &[FieldKey::Principal, FieldKey::Rate, FieldKey::Amount],
        solve: simple_periods_from_amount,
    },
    Derivation {
        solves: FieldKey::Interest,
        requires: &[FieldKey::Principal, FieldKey::Rate, FieldKey::Periods],
        solve: simple_interest,
    },
    Derivation {
        solves: FieldKey::Amount,
        requires: &[FieldKey::Principal, FieldKey::Rate, FieldKey::Periods],
        solve: simple_amount,
    },
];

const COMPOUND: &[Derivation] = &[
    Derivation {
        solves: FieldKey::Amount,
        requires: &[FieldKey::Principal, FieldKey::Rate, FieldKey::Periods, FieldKey::Frequency],
        solve: compound_amount,
    },
    Derivation {
        solves: FieldKey::Principal,
        requires: &[FieldKey::Rate, FieldKey::Periods, FieldKey::Frequency, FieldKey::Amount],
        solve: compound_principal,
    },
    Derivation {
        solves: FieldKey::Rate,
        requires: &[FieldKey::Principal, FieldKey::Periods, FieldKey::Frequency, FieldKey::Amount],
        solve: compound_rate,
    },
    Derivation {
        solves: FieldKey::Periods,
        requires: &[FieldKey::Principal, FieldKey::Rate, FieldKey::Frequency, FieldKey::Amount],
        solve: compound_periods,
    },
    Derivation {
        solves: FieldKey::Interest,
        requires: &[FieldKey::Principal, FieldKey::Rate, FieldKey::Periods, FieldKey::Frequency],
        solve: compound_interest,
    },
];

fn solution(value: f64, detail: String) -> Solution {
    Solution { value, detail }
}

fn simple_principal_from_interest(x: &Inputs) -> Solution {
    let v = x.interest / (x.i * x.n);
    solution(
        v,
        format!(
            "C = I / (i × n) = {} / ({}% × {}) = {:.2}",
            x.interest, x.pct, x.n, v
        ),
    )
}

fn simple_principal_from_amount(x: &Inputs) -> Solution {
    let v = x.amount / (1. + x.i * x.n);
    solution(
        v,
        format!(
            "C = M / (1 + i × n) = {} / (1 + {}% × {}) = {:.2}",
            x.amount, x.pct, x.n, v
        ),
    )
}

fn simple_rate_from_interest(x: &Inputs) -> Solution {
    let v = x.interest / (x.c * x.n) * 100.;
    solution(
        v,
        format!(
            "i = I / (C × n) = {} / ({} × {}) × 100 = {:.2}%",
            x.interest, x.c, x.n, v
        ),
    )
}

fn simple_rate_from_amount(x: &Inputs) -> Solution {
    let v = (x.amount / x.c - 1.) / x.n * 100.;
    solution(
        v,
        format!(
            "i = (M/C - 1) / n = (({}/{}) - 1) / {} × 100 = {:.2}%",
            x.amount, x.c, x.n, v
        ),
    )
}

fn simple_periods_from_interest(x: &Inputs) -> Solution {
    let v = x.interest / (x.c * x.i);
    solution(
        v,
        format!(
            "n = I / (C × i) = {} / ({} × {}%) = {:.2} years",
            x.interest, x.c, x.pct, v
        ),
    )
}

fn simple_periods_from_amount(x: &Inputs) -> Solution {
    let v = (x.amount / x.c - 1.) / x.i;
    solution(
        v,
        format!(
            "n = (M/C - 1) / i = (({}/{}) - 1) / {}% = {:.2} years",
            x.amount, x.c, x.pct, v
        ),
    )
}

fn simple_interest(x: &Inputs) -> Solution {
    let v = x.c * x.i * x.n;
    let detail = format!("I = C × i × n = {} × {}% × {} = {:.2}", x.c, x.pct, x.n, v);
    solution(v, detail)
}

fn simple_amount(x: &Inputs) -> Solution {
    let v = x.c * (1. + x.i * x.n);
    solution(
        v,
        format!("M = C × (1 + i × n) = {} × (1 + {}% × {}) = {:.2}", x.c, x.pct, x.n, v),
    )
}

fn growth(x: &Inputs) -> f64 {
    (1. + x.i / x.m).powf(x.n * x.m)
}

fn compound_amount(x: &Inputs) -> Solution {
    let v = x.c * growth(x);
    solution(
        v,
        format!(
            "M = C × (1 + i/m)^(n×m) = {} × (1 + {}%/{})^({}×{}) = {:.2}",
            x.c, x.pct, x.m, x.n, x.m, v
        ),
    )
}

fn compound_principal(x: &Inputs) -> Solution {
    let v = x.amount / growth(x);
    solution(
        v,
        format!(
            "C = M / (1 + i/m)^(n×m) = {} / (1 + {}%/{})^({}×{}) = {:.2}",
            x.amount, x.pct, x.m, x.n, x.m, v
        ),
    )
}

fn compound_rate(x: &Inputs) -> Solution {
    let v = x.m * ((x.amount / x.c).powf(1. / (x.n * x.m)) - 1.) * 100.;
    solution(
        v,
        format!(
            "i = m × ((M/C)^(1/(n×m)) - 1) × 100 = {} × (({}/{})^(1/({}×{})) - 1) × 100 = {:.2}%",
            x.m, x.amount, x.c, x.n, x.m, v
        ),
    )
}

fn compound_periods(x: &Inputs) -> Solution {
    let v = (x.amount / x.c).ln() / (x.m * (1. + x.i / x.m).ln());
    solution(
        v,
        format!(
            "n = ln(M/C) / (m × ln(1 + i/m)) = ln({}/{}) / ({} × ln(1 + {}%/{})) = {:.2} years",
            x.amount, x.c, x.m, x.pct, x.m, v
        ),
    )
}

fn compound_interest(x: &Inputs) -> Solution {
    let amount = x.c * growth(x);
    let v = amount - x.c;
    let detail = format!(
        "M = C × (1 + i/m)^(n×m) = {} × (1 + {}%/{})^({}×{}) = {:.2}\nI = M - C = {:.2} - {} = {:.2}",
        x.c, x.pct, x.m, x.n, x.m, amount, amount, x.c, v
    );
    solution(v, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_log::test;
    use FieldKey::{Amount, Frequency, Interest, Periods, Principal, Rate};

    fn simple(pairs: &[(FieldKey, f64)]) -> Fields {
        pairs
            .iter()
            .fold(Fields::default(), |f, &(k, v)| f.with(k, v))
    }

    #[test]
    fn test_simple_interest_defaults() {
        let calc = InterestCalculator::default();
        let sol = calc.calculate().unwrap();

        assert_relative_eq!(sol.value, 1500., epsilon = 1e-9);
        assert_eq!(sol.detail, "I = C × i × n = 10000 × 5% × 3 = 1500.00");
    }

    #[test]
    fn test_compound_amount_defaults() {
        let calc = InterestCalculator::new(InterestMode::Compound);
        let sol = calc.calculate().unwrap();

        assert_relative_eq!(sol.value, 11728.879317, epsilon = 1e-5);
        assert_eq!(
            sol.detail,
            "M = C × (1 + i/m)^(n×m) = 10000 × (1 + 8%/12)^(2×12) = 11728.88"
        );
    }

    #[test]
    fn test_simple_missing_periods() {
        let fields = simple(&[(Principal, 10000.), (Rate, 5.)]);
        let err = solve_interest(InterestMode::Simple, &fields, Some(Interest)).unwrap_err();
        assert!(matches!(err, CalcError::InsufficientInputs(_)), "{err:?}");
    }

    #[test]
    fn test_missing_unknown() {
        let fields = Fields::defaults(InterestMode::Simple);
        assert_eq!(
            solve_interest(InterestMode::Simple, &fields, None),
            Err(CalcError::MissingUnknown)
        );
    }

    #[test]
    fn test_non_positive_field() {
        let fields = simple(&[(Principal, 10000.), (Rate, 0.), (Periods, 3.)]);
        assert_eq!(
            solve_interest(InterestMode::Simple, &fields, Some(Interest)),
            Err(CalcError::InvalidField { field: "i" })
        );

        let fields = simple(&[(Principal, f64::NAN), (Rate, 5.), (Periods, 3.)]);
        assert_eq!(
            solve_interest(InterestMode::Simple, &fields, Some(Amount)),
            Err(CalcError::InvalidField { field: "C" })
        );
    }

    #[test]
    fn test_simple_needs_interest_or_amount() {
        let fields = simple(&[(Rate, 5.), (Periods, 3.)]);
        let err = solve_interest(InterestMode::Simple, &fields, Some(Principal)).unwrap_err();
        assert!(matches!(err, CalcError::InsufficientInputs(_)));

        // a non-positive I does not count as supplied
        let fields = simple(&[(Rate, 5.), (Periods, 3.), (Interest, -1.)]);
        let err = solve_interest(InterestMode::Simple, &fields, Some(Principal)).unwrap_err();
        assert!(matches!(err, CalcError::InsufficientInputs(_)));
    }

    #[test]
    fn test_simple_prefers_interest_formula() {
        // I and M disagree; the I-based formula must win
        let fields = simple(&[
            (Rate, 5.),
            (Periods, 3.),
            (Interest, 1500.),
            (Amount, 99999.),
        ]);
        let sol = solve_interest(InterestMode::Simple, &fields, Some(Principal)).unwrap();
        assert_relative_eq!(sol.value, 10000., epsilon = 1e-9);
        assert_eq!(sol.detail, "C = I / (i × n) = 1500 / (5% × 3) = 10000.00");

        let fields = simple(&[(Rate, 5.), (Periods, 3.), (Amount, 11500.)]);
        let sol = solve_interest(InterestMode::Simple, &fields, Some(Principal)).unwrap();
        assert_relative_eq!(sol.value, 10000., epsilon = 1e-9);
        assert_eq!(sol.detail, "C = M / (1 + i × n) = 11500 / (1 + 5% × 3) = 10000.00");
    }

    #[test]
    fn test_simple_rate_and_periods() {
        let fields = simple(&[(Principal, 10000.), (Periods, 3.), (Amount, 11500.)]);
        let sol = solve_interest(InterestMode::Simple, &fields, Some(Rate)).unwrap();
        assert_relative_eq!(sol.value, 5., epsilon = 1e-9);
        assert_eq!(sol.detail, "i = (M/C - 1) / n = ((11500/10000) - 1) / 3 × 100 = 5.00%");

        let fields = simple(&[(Principal, 10000.), (Rate, 5.), (Interest, 1500.)]);
        let sol = solve_interest(InterestMode::Simple, &fields, Some(Periods)).unwrap();
        assert_relative_eq!(sol.value, 3., epsilon = 1e-9);
        assert_eq!(sol.detail, "n = I / (C × i) = 1500 / (10000 × 5%) = 3.00 years");
    }

    #[test]
    fn test_compound_principal_requires_amount() {
        let fields = Fields::defaults(InterestMode::Compound).with(Interest, 1728.88);
        let err = solve_interest(InterestMode::Compound, &fields, Some(Principal)).unwrap_err();
        assert!(matches!(err, CalcError::Domain(_)), "{err:?}");
    }

    #[test]
    fn test_compound_inverse_formulas() {
        let amount = 10000. * (1_f64 + 0.08 / 12.).powf(24.);
        let base = Fields::defaults(InterestMode::Compound).with(Amount, amount);

        let c = solve_interest(InterestMode::Compound, &base, Some(Principal)).unwrap();
        assert_relative_eq!(c.value, 10000., epsilon = 1e-6);

        let i = solve_interest(InterestMode::Compound, &base, Some(Rate)).unwrap();
        assert_relative_eq!(i.value, 8., epsilon = 1e-9);
        assert!(i.detail.ends_with("= 8.00%"));

        let n = solve_interest(InterestMode::Compound, &base, Some(Periods)).unwrap();
        assert_relative_eq!(n.value, 2., epsilon = 1e-9);
        assert!(n.detail.ends_with("= 2.00 years"));
    }

    #[test]
    fn test_compound_interest_shows_amount_first() {
        let fields = Fields::defaults(InterestMode::Compound);
        let sol = solve_interest(InterestMode::Compound, &fields, Some(Interest)).unwrap();
        assert_relative_eq!(sol.value, 1728.879317, epsilon = 1e-5);
        assert_eq!(
            sol.detail,
            "M = C × (1 + i/m)^(n×m) = 10000 × (1 + 8%/12)^(2×12) = 11728.88\n\
             I = M - C = 11728.88 - 10000 = 1728.88"
        );
    }

    #[test]
    fn test_compound_needs_four_inputs() {
        let fields = Fields::defaults(InterestMode::Compound);
        let err = solve_interest(InterestMode::Compound, &fields, Some(Periods)).unwrap_err();
        assert!(matches!(err, CalcError::InsufficientInputs(_)));

        let fields = Fields::defaults(InterestMode::Compound).with(Frequency, -4.);
        assert_eq!(
            solve_interest(InterestMode::Compound, &fields, Some(Amount)),
            Err(CalcError::InvalidField { field: "m" })
        );
    }

    #[test]
    fn test_frequency_has_no_formula() {
        let mut calc = InterestCalculator::new(InterestMode::Compound);
        calc.set(Amount, Some(12000.));
        calc.select_unknown(Frequency);
        assert_eq!(calc.formula(), None);
        assert!(matches!(calc.calculate(), Err(CalcError::Domain(_))));
    }

    #[test]
    fn test_calculator_state() {
        let mut calc = InterestCalculator::default();
        assert_eq!(calc.unknown(), Some(Interest));
        assert_eq!(calc.formula(), Some("I = C × i × n"));

        calc.select_unknown(Principal);
        assert_eq!(calc.unknown(), Some(Principal));
        assert_eq!(
            calc.formula(),
            Some("C = I / (i × n)  or  C = M / (1 + i × n)")
        );

        calc.clear_unknown();
        assert_eq!(calc.formula(), None);
        assert_eq!(calc.calculate(), Err(CalcError::MissingUnknown));

        calc.set(Principal, Some(1.));
        calc.set_mode(InterestMode::Compound);
        assert_eq!(calc.mode(), InterestMode::Compound);
        assert_eq!(calc.unknown(), Some(Amount));
        assert_eq!(calc.fields(), &Fields::defaults(InterestMode::Compound));
        assert_eq!(calc.get(Frequency), Some(12.));
    }

    #[test]
    fn test_overflowing_result() {
        let fields = simple(&[(Principal, 1e308), (Rate, 100.), (Periods, 10.)]);
        let err = solve_interest(InterestMode::Simple, &fields, Some(Amount)).unwrap_err();
        assert!(matches!(err, CalcError::Domain(_)), "{err:?}");
    }

    #[test]
    fn test_unknown_value_is_ignored() {
        let fields = Fields::defaults(InterestMode::Simple).with(Interest, 7.);
        let sol = solve_interest(InterestMode::Simple, &fields, Some(Interest)).unwrap();
        assert_relative_eq!(sol.value, 1500., epsilon = 1e-9);
    }
}
