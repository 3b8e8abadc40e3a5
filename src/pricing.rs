//! Black-Scholes theoretical value of European options.
//!
//! Time to expiration is given in days and converted with a 365-day year.
//! At or past expiration the estimate collapses to intrinsic value.

use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

use crate::types::OptionKind;

const DAYS_PER_YEAR: f64 = 365.0;

fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standardized distance between spot and strike, adjusted for drift and volatility.
fn d1(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

fn d2(d1: f64, sigma: f64, t: f64) -> f64 {
    d1 - sigma * t.sqrt()
}

/// `S·N(d1) − K·e^{−rT}·N(d2)`
pub fn call_option_value(s: f64, k: f64, r: f64, sigma: f64, t_days: i64) -> f64 {
    if t_days <= 0 {
        return (s - k).max(0.0);
    }
    let t = t_days as f64 / DAYS_PER_YEAR;
    let d1 = d1(s, k, r, sigma, t);
    let d2 = d2(d1, sigma, t);
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// `K·e^{−rT}·N(−d2) − S·N(−d1)`
pub fn put_option_value(s: f64, k: f64, r: f64, sigma: f64, t_days: i64) -> f64 {
    if t_days <= 0 {
        return (k - s).max(0.0);
    }
    let t = t_days as f64 / DAYS_PER_YEAR;
    let d1 = d1(s, k, r, sigma, t);
    let d2 = d2(d1, sigma, t);
    k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1)
}

pub fn option_value(s: f64, k: f64, r: f64, sigma: f64, t_days: i64, kind: OptionKind) -> f64 {
    match kind {
        OptionKind::Call => call_option_value(s, k, r, sigma, t_days),
        OptionKind::Put => put_option_value(s, k, r, sigma, t_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn expired_options_are_intrinsic() {
        assert_eq!(call_option_value(105.0, 100.0, 0.05, 0.2, 0), 5.0);
        assert_eq!(call_option_value(95.0, 100.0, 0.05, 0.2, 0), 0.0);
        assert_eq!(put_option_value(95.0, 100.0, 0.05, 0.2, -3), 5.0);
        assert_eq!(put_option_value(105.0, 100.0, 0.05, 0.2, 0), 0.0);
    }

    #[test]
    fn atm_call_one_year() {
        // S=K=100, r=5%, sigma=20%, T=1y: 10.4506
        let c = call_option_value(100.0, 100.0, 0.05, 0.2, 365);
        assert!(close(c, 10.4506, 1e-3), "{c}");
    }

    #[test]
    fn put_call_parity() {
        let (s, k, r, sigma, days) = (97.0, 105.0, 0.03, 0.35, 45);
        let t = days as f64 / DAYS_PER_YEAR;
        let c = option_value(s, k, r, sigma, days, OptionKind::Call);
        let p = option_value(s, k, r, sigma, days, OptionKind::Put);
        assert!(close(c - p, s - k * (-r * t).exp(), 1e-9));
    }

    #[test]
    fn value_grows_with_time() {
        let short = call_option_value(100.0, 100.0, 0.0, 0.4, 5);
        let long = call_option_value(100.0, 100.0, 0.0, 0.4, 60);
        assert!(long > short && short > 0.0);
    }
}
