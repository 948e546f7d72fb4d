//! Interest solver and amortization schedule builder.
//!
//! Both engines are pure functions of their inputs: every call recomputes its result
//! from scratch and shares no state with any other call.

pub mod amortization;
pub mod error;
pub mod interest;

pub use amortization::{
    build_amortization, AmortizationResult, Installment, Installments, LoanTerms, Method,
    PaymentFrequency,
};
pub use error::{CalcError, CalcResult};
pub use interest::{solve_interest, FieldKey, Fields, InterestCalculator, InterestMode, Solution};
