//! Parse contracts from their text form.
//! Options: "+1 95 call 6.25 [2023-05-01]". Stock: "-2 stock 98".

use chrono::NaiveDate;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::contract::{Contract, OptionContract, StockContract};
use crate::error::{Error, Result};
use crate::types::{OptionKind, Side};

static RE_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([+-]?\d+)\s+(\d+(?:\.\d+)?)\s+(call|put)\s+(\d+(?:\.\d+)?)(?:\s+(\S+))?$")
        .expect("option contract pattern")
});

static RE_STOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([+-]?\d+)\s+stock\s+(\d+(?:\.\d+)?)$").expect("stock contract pattern")
});

pub fn parse_contract(text: &str) -> Result<Contract> {
    let t = text.trim();

    if let Some(c) = RE_STOCK.captures(t) {
        let (count, side) = signed_count(text, &c[1])?;
        let price = number(text, &c[2])?;
        return Ok(Contract::Stock(StockContract::new(count, side, price)));
    }

    if let Some(c) = RE_OPTION.captures(t) {
        let (count, side) = signed_count(text, &c[1])?;
        let strike = number(text, &c[2])?;
        let kind = match c[3].to_ascii_lowercase().as_str() {
            "call" => OptionKind::Call,
            _ => OptionKind::Put,
        };
        let premium = number(text, &c[4])?;
        let mut option = OptionContract::new(count, side, kind, strike, premium);
        if let Some(date) = c.get(5) {
            let date = NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d")
                .map_err(|e| Error::parse(text, format!("bad expiration date: {e}")))?;
            option = option.with_expiration(date);
        }
        return Ok(Contract::Option(option));
    }

    Err(Error::parse(
        text,
        "expected \"<count> <strike> <call|put> <premium> [date]\" or \"<count> stock <price>\"",
    ))
}

/// Parses every entry, failing on the first malformed one.
pub fn parse_contracts<S: AsRef<str>>(texts: &[S]) -> Result<Vec<Contract>> {
    texts.iter().map(|s| parse_contract(s.as_ref())).collect()
}

impl FromStr for Contract {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_contract(s)
    }
}

fn signed_count(input: &str, raw: &str) -> Result<(u32, Side)> {
    let n: i64 = raw
        .parse()
        .map_err(|e| Error::parse(input, format!("bad count {raw:?}: {e}")))?;
    if n == 0 {
        return Err(Error::parse(input, "count must not be zero"));
    }
    let count = i32::try_from(n.unsigned_abs())
        .map_err(|_| Error::parse(input, format!("count {raw} is too large")))?;
    Ok((count.unsigned_abs(), Side::from_signed_count(n)))
}

fn number(input: &str, raw: &str) -> Result<f64> {
    raw.parse()
        .map_err(|e| Error::parse(input, format!("bad number {raw:?}: {e}")))
}
