//! Formula descriptions for tooltips. Strings only, no computation.

const FORMULAS: &[(&str, &str)] = &[
    ("primary_members", "previous + intake × physicians × curve(month), then − members × annual churn % / 12"),
    ("specialty_members", "previous + intake × physicians × curve(month), then − patients × annual churn % / 12"),
    ("revenue.primary", "active primary members × primary price"),
    ("revenue.specialty", "active specialty patients × specialty price per visit"),
    ("revenue.corporate", "contracts per month × months since start × employees per contract × price per employee"),
    ("revenue.echo", "(primary + specialty members) × echo price × echo utilization"),
    ("revenue.ct", "(primary + specialty members) × CT price × CT utilization"),
    ("revenue.labs", "(primary + specialty members) × lab price × lab utilization"),
    ("costs.salaries", "Σ staff on payroll × annual salary / 12"),
    ("costs.fixed_overhead", "fixed overhead + marketing"),
    ("costs.variable", "total revenue × variable cost %"),
    ("costs.equipment_lease", "monthly lease once diagnostics start, else 0"),
    ("profit", "total revenue − total costs"),
    ("cumulative_cash", "previous cumulative cash + profit (month 0 starts from starting capital)"),
    ("breakeven_month", "first month where cumulative cash ≥ 0"),
    ("launch_mrr", "total revenue in the launch month"),
    ("total_ramp_burn", "−Σ profit over the ramp months"),
    ("physician.specialty_retained", "specialty revenue per physician × (1 − service fee)"),
    ("physician.equity_income", "MSO net profit at the reference month × equity stake"),
    ("physician.roi", "(retained + equity income) × 12 / investment × 100"),
];

pub fn formula_description(key: &str) -> Option<&'static str> {
    FORMULAS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, description)| *description)
}

pub fn formula_keys() -> impl Iterator<Item = &'static str> {
    FORMULAS.iter().map(|(k, _)| *k)
}
