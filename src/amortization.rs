use crate::error::{CalcError, CalcResult};
use chrono::{Datelike, NaiveDate};
use log::{debug, trace};
use std::fmt;

/// How each installment is split between principal and interest.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// Constant total payment; the principal share grows as interest falls.
    #[default]
    French,
    /// Constant principal share; the total payment falls with the interest.
    German,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::French => write!(f, "French"),
            Method::German => write!(f, "German"),
        }
    }
}

/// Calendar frequencies that due dates can be generated for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaymentFrequency {
    Weekly,
    Biweekly,
    SemiMonthly,
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

impl PaymentFrequency {
    pub fn from_payments_per_year(payments_per_year: f64) -> Option<Self> {
        if payments_per_year.fract() != 0. {
            return None;
        }
        match payments_per_year as u32 {
            52 => Some(PaymentFrequency::Weekly),
            26 => Some(PaymentFrequency::Biweekly),
            24 => Some(PaymentFrequency::SemiMonthly),
            12 => Some(PaymentFrequency::Monthly),
            4 => Some(PaymentFrequency::Quarterly),
            2 => Some(PaymentFrequency::SemiAnnually),
            1 => Some(PaymentFrequency::Annually),
            _ => None,
        }
    }

    /// Due date following `date`. Month steps clamp to the end of shorter months.
    pub fn next_due_date(self, date: NaiveDate) -> Option<NaiveDate> {
        let months = |n| date.checked_add_months(chrono::Months::new(n));
        match self {
            PaymentFrequency::Weekly => date.checked_add_days(chrono::Days::new(7)),
            PaymentFrequency::Biweekly => date.checked_add_days(chrono::Days::new(14)),
            // semi-monthly installments fall on the 1st and 15th
            PaymentFrequency::SemiMonthly => {
                if date.day() == 1 {
                    NaiveDate::from_ymd_opt(date.year(), date.month(), 15)
                } else if date.month() == 12 {
                    NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
                }
            }
            PaymentFrequency::Monthly => months(1),
            PaymentFrequency::Quarterly => months(3),
            PaymentFrequency::SemiAnnually => months(6),
            PaymentFrequency::Annually => months(12),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Installment {
    pub number: u32,
    pub due_date: Option<NaiveDate>,
    pub total_payment: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub remaining_balance: f64,
}

impl fmt::Display for Installment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "installment {}", self.number)?;
        if let Some(date) = self.due_date {
            write!(f, ", due {}", date)?;
        }
        write!(
            f,
            ", payment ${:.2}, principal ${:.2}, interest ${:.2}, balance ${:.2}",
            self.total_payment,
            self.principal_portion,
            self.interest_portion,
            self.remaining_balance
        )
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmortizationResult {
    pub installments: Vec<Installment>,
    pub total_paid: f64,
    pub total_interest: f64,
    pub installment_count: usize,
}

impl FromIterator<Installment> for AmortizationResult {
    fn from_iter<T: IntoIterator<Item = Installment>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), |mut acc, row| {
            acc.total_paid += row.total_payment;
            acc.total_interest += row.interest_portion;
            acc.installment_count += 1;
            acc.installments.push(row);
            acc
        })
    }
}

impl AmortizationResult {
    /// Installment by its 1-based number.
    pub fn installment(&self, number: usize) -> Option<&Installment> {
        number
            .checked_sub(1)
            .and_then(|idx| self.installments.get(idx))
    }

    pub fn installment_info(&self, number: usize) -> String {
        match self.installment(number) {
            Some(row) => row.to_string(),
            None => "No installment information.".to_string(),
        }
    }

    pub fn show_amortization(&self) {
        for row in &self.installments {
            println!("{}", row);
        }
        println!(
            "{} installments, total paid ${:.2}, total interest ${:.2}",
            self.installment_count, self.total_paid, self.total_interest
        );
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanTerms {
    pub principal: f64,
    /// nominal annual rate as a percentage (12.0 is 12%)
    pub annual_rate: f64,
    pub years: f64,
    pub payments_per_year: f64,
    pub method: Method,
    pub first_due: Option<NaiveDate>,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self::new(50000., 12., 2., 12., Method::French)
    }
}

impl LoanTerms {
    pub fn new(
        principal: f64,
        annual_rate: f64,
        years: f64,
        payments_per_year: f64,
        method: Method,
    ) -> Self {
        Self {
            principal,
            annual_rate,
            years,
            payments_per_year,
            method,
            first_due: None,
        }
    }

    /// Stamp installments with calendar due dates starting at `date`.
    pub fn first_due(mut self, date: NaiveDate) -> Self {
        self.first_due = Some(date);
        self
    }

    /// Lazily generated installments. Calling again restarts from the first one.
    pub fn installments(&self) -> CalcResult<Installments> {
        let plan = self.plan()?;
        let frequency = match self.first_due {
            Some(_) => Some(
                PaymentFrequency::from_payments_per_year(self.payments_per_year).ok_or_else(
                    || {
                        CalcError::Domain(format!(
                            "no calendar frequency for {} payments per year",
                            self.payments_per_year
                        ))
                    },
                )?,
            ),
            None => None,
        };

        Ok(Installments {
            plan,
            number: 0,
            balance: self.principal,
            due: self.first_due,
            frequency,
        })
    }

    pub fn schedule(&self) -> CalcResult<AmortizationResult> {
        Ok(self.installments()?.collect())
    }

    fn plan(&self) -> CalcResult<Plan> {
        positive(self.principal, "principal")?;
        positive(self.annual_rate, "annual_rate")?;
        positive(self.years, "years")?;
        positive(self.payments_per_year, "payments_per_year")?;

        let count = (self.years * self.payments_per_year).round();
        if count < 1. {
            return Err(CalcError::DivisionByZero {
                context: "installment count (years × payments per year rounds to 0)".into(),
            });
        }
        if count > u32::MAX as f64 {
            return Err(CalcError::Domain(format!(
                "{count} installments exceeds the supported schedule length"
            )));
        }
        let period_rate = (self.annual_rate / 100.) / self.payments_per_year;

        let level = match self.method {
            // P·r·f / (f - 1) with f = (1 + r)^count, divided through by f so a huge
            // factor underflows to 0 instead of overflowing
            Method::French => {
                let denominator = 1. - (1. + period_rate).powf(-count);
                if denominator == 0. {
                    return Err(CalcError::DivisionByZero {
                        context: "French payment factor".into(),
                    });
                }
                self.principal * period_rate / denominator
            }
            Method::German => self.principal / count,
        };
        if !level.is_finite() || !period_rate.is_finite() {
            return Err(CalcError::Domain(format!(
                "{} installment amount does not evaluate to a finite number",
                self.method
            )));
        }
        debug!(
            "{} schedule: {} installments, period rate {}, level amount {}",
            self.method, count, period_rate, level
        );

        Ok(Plan {
            method: self.method,
            count: count as u32,
            period_rate,
            level,
        })
    }
}

/// Five-argument entry point; equivalent to `LoanTerms::new(..).schedule()`.
pub fn build_amortization(
    principal: f64,
    annual_rate: f64,
    years: f64,
    payments_per_year: f64,
    method: Method,
) -> CalcResult<AmortizationResult> {
    LoanTerms::new(principal, annual_rate, years, payments_per_year, method).schedule()
}

fn positive(value: f64, field: &'static str) -> CalcResult<()> {
    if value.is_finite() && value > 0. {
        Ok(())
    } else {
        Err(CalcError::invalid(field))
    }
}

/// Validated schedule parameters.
#[derive(Clone, Copy, Debug)]
struct Plan {
    method: Method,
    count: u32,
    period_rate: f64,
    // fixed payment for French, fixed principal for German
    level: f64,
}

impl Plan {
    /// Installment `number` given the balance outstanding at the start of its period.
    fn installment(&self, number: u32, opening_balance: f64) -> Installment {
        let last = number == self.count;
        let interest = opening_balance * self.period_rate;
        let principal = match self.method {
            // the final French installment absorbs the rounding drift
            Method::French if last => opening_balance,
            Method::French => self.level - interest,
            Method::German => self.level,
        };

        let mut balance = opening_balance - principal;
        if last || balance.abs() < 0.01 {
            balance = 0.;
        }

        Installment {
            number,
            due_date: None,
            total_payment: principal + interest,
            principal_portion: principal,
            interest_portion: interest,
            remaining_balance: balance,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Installments {
    plan: Plan,
    number: u32,
    balance: f64,
    due: Option<NaiveDate>,
    frequency: Option<PaymentFrequency>,
}

impl Iterator for Installments {
    type Item = Installment;

    fn next(&mut self) -> Option<Installment> {
        if self.number >= self.plan.count {
            return None;
        }
        self.number += 1;

        let mut row = self.plan.installment(self.number, self.balance);
        row.due_date = self.due;
        trace!("{}", row);

        self.balance = row.remaining_balance;
        self.due = match (self.due, self.frequency) {
            (Some(date), Some(freq)) => freq.next_due_date(date),
            _ => None,
        };
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.plan.count - self.number) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Installments {}
