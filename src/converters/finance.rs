//! Loan and discount calculators.

/// Monthly installment breakdown for a loan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoanSummary {
    pub emi: f64,
    pub total_interest: f64,
    pub total_payable: f64,
}

/// Equated monthly installment for `principal` at `annual_rate_percent`
/// over `tenure_years`.
pub fn loan(principal: f64, annual_rate_percent: f64, tenure_years: f64) -> Option<LoanSummary> {
    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    let months = tenure_years * 12.0;
    if !(principal > 0.0 && monthly_rate >= 0.0 && months > 0.0) {
        return None;
    }

    if monthly_rate == 0.0 {
        return Some(LoanSummary {
            emi: principal / months,
            total_interest: 0.0,
            total_payable: principal,
        });
    }

    let growth = (1.0 + monthly_rate).powf(months);
    let emi = principal * monthly_rate * growth / (growth - 1.0);
    let total_payable = emi * months;
    Some(LoanSummary {
        emi,
        total_interest: total_payable - principal,
        total_payable,
    })
}

/// Price after discount and tax.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscountSummary {
    pub final_price: f64,
    pub you_save: f64,
}

/// Apply `discount_percent` (0 to 100) then `tax_percent` to `price`.
pub fn discount(price: f64, discount_percent: f64, tax_percent: f64) -> Option<DiscountSummary> {
    if !(price > 0.0 && (0.0..=100.0).contains(&discount_percent) && tax_percent >= 0.0) {
        return None;
    }
    let discounted = price * (1.0 - discount_percent / 100.0);
    let tax = discounted * (tax_percent / 100.0);
    Some(DiscountSummary {
        final_price: discounted + tax,
        you_save: price - discounted,
    })
}
