//! Token-based extraction of dates, times, and order lines from free text.
//! Deliberately not NLU: deterministic scans over whitespace/comma tokens.

use chrono::{Duration, NaiveDate, NaiveTime};
use kasibot_core::{OrderLineRequest, Product};

/// First date found in the text: a `YYYY-MM-DD` token, or the words
/// "today" / "tomorrow" relative to `today`.
pub fn extract_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    for token in tokens(text) {
        if let Ok(date) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
            return Some(date);
        }
    }
    if text.contains("tomorrow") {
        return Some(today + Duration::days(1));
    }
    if text.contains("today") {
        return Some(today);
    }
    None
}

/// First `HH:MM` token found in the text.
pub fn extract_time(text: &str) -> Option<NaiveTime> {
    for token in tokens(text) {
        if token.contains(':') {
            if let Ok(time) = NaiveTime::parse_from_str(token, "%H:%M") {
                return Some(time);
            }
        }
    }
    None
}

/// Extracts order lines from forms like "2 bread", "bread x2", "2x milk",
/// "milk x 3". Quantities for the same product are merged; products the
/// catalog cannot match are skipped.
pub fn extract_order_lines(text: &str, products: &[Product]) -> Vec<OrderLineRequest> {
    let toks: Vec<&str> = tokens(text).collect();
    let mut lines: Vec<OrderLineRequest> = Vec::new();

    let mut i = 0;
    while i < toks.len() {
        let tok = toks[i];

        // "<n> <name>" and "<n>x <name>" / "<n> x <name>"
        if let Some(qty) = parse_quantity(tok) {
            let mut j = i + 1;
            if j < toks.len() && toks[j].eq_ignore_ascii_case("x") {
                j += 1;
            }
            if j < toks.len() {
                if let Some(product) = match_product(toks[j], products) {
                    push_line(&mut lines, product, qty);
                    i = j + 1;
                    continue;
                }
            }
            i += 1;
            continue;
        }

        // "<name> x<n>" / "<name> x <n>"
        if let Some(product) = match_product(tok, products) {
            let mut qty = None;
            let mut j = i + 1;
            if j < toks.len() {
                if let Some(n) = toks[j].strip_prefix(['x', 'X']).and_then(|r| r.parse().ok()) {
                    qty = Some(n);
                    j += 1;
                } else if toks[j].eq_ignore_ascii_case("x")
                    && j + 1 < toks.len()
                    && toks[j + 1].chars().all(|c| c.is_ascii_digit())
                {
                    qty = toks[j + 1].parse().ok();
                    j += 2;
                }
            }
            if let Some(qty) = qty {
                push_line(&mut lines, product, qty);
                i = j;
                continue;
            }
        }

        i += 1;
    }

    lines
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
}

/// "2" or "2x" as a positive quantity.
fn parse_quantity(token: &str) -> Option<i64> {
    let digits = token.strip_suffix(['x', 'X']).unwrap_or(token);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n > 0)
}

/// Matches a token against the catalog: the token is contained in the
/// product name, or the token contains the product name's first word.
fn match_product<'a>(token: &str, products: &'a [Product]) -> Option<&'a Product> {
    let token = token.to_lowercase();
    if token.len() < 3 {
        return None;
    }
    products.iter().find(|p| {
        let name = p.name.to_lowercase();
        name.contains(&token)
            || name
                .split_whitespace()
                .next()
                .map(|first| token.contains(first))
                .unwrap_or(false)
    })
}

fn push_line(lines: &mut Vec<OrderLineRequest>, product: &Product, qty: i64) {
    if let Some(line) = lines.iter_mut().find(|l| l.product_id == product.id) {
        line.quantity += qty;
    } else {
        lines.push(OrderLineRequest {
            product_id: product.id,
            quantity: qty,
        });
    }
}
