use chrono::NaiveDate;
use fincalc::{InterestCalculator, InterestMode, LoanTerms, Method};
use log::{error, info};
use simple_logger::SimpleLogger;

fn main() {
    // RUST_LOG overrides the default level
    if let Err(e) = SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("logger already initialised: {e}");
    }

    for mode in [InterestMode::Simple, InterestMode::Compound] {
        let calc = InterestCalculator::new(mode);
        info!(
            "{} interest, formula {}",
            mode,
            calc.formula().unwrap_or("(none)")
        );
        match calc.calculate() {
            Ok(solution) => println!("{}\n", solution.detail),
            Err(e) => error!("{} interest: {}", mode, e),
        }
    }

    for method in [Method::French, Method::German] {
        let terms = LoanTerms {
            method,
            ..LoanTerms::default()
        };
        let terms = match NaiveDate::from_ymd_opt(2024, 4, 1) {
            Some(date) => terms.first_due(date),
            None => terms,
        };
        match terms.schedule() {
            Ok(result) => {
                info!("{} amortization of {:.2}", method, terms.principal);
                result.show_amortization();
                println!();
            }
            Err(e) => error!("{} amortization: {}", method, e),
        }
    }
}

// verifies that result types can be handed across threads
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<fincalc::Installment>();
    is_normal::<fincalc::AmortizationResult>();
    is_normal::<fincalc::Solution>();
    is_normal::<fincalc::CalcError>();
}
