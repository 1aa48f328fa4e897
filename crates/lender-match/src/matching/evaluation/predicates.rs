use super::super::domain::Application;
use super::super::rule_set::{RuleValue, RuleValueError};
use super::registry::RuleCheck;

type CheckResult = Result<RuleCheck, RuleValueError>;

pub(crate) fn min_fico(application: &Application, value: &RuleValue) -> CheckResult {
    let minimum = value.as_number()?;
    if f64::from(application.fico_score) < minimum {
        return Ok(RuleCheck::failed(format!(
            "FICO Score {} is below minimum {value}",
            application.fico_score
        )));
    }
    Ok(RuleCheck::Passed)
}

pub(crate) fn min_tib_years(application: &Application, value: &RuleValue) -> CheckResult {
    let minimum = value.as_number()?;
    if application.years_in_business < minimum {
        return Ok(RuleCheck::failed(format!(
            "Time in Business {} years is below minimum {value}",
            application.years_in_business
        )));
    }
    Ok(RuleCheck::Passed)
}

pub(crate) fn min_revenue(application: &Application, value: &RuleValue) -> CheckResult {
    let minimum = value.as_number()?;
    if application.annual_revenue < minimum {
        return Ok(RuleCheck::failed(format!(
            "Annual Revenue {} is below minimum {value}",
            application.annual_revenue
        )));
    }
    Ok(RuleCheck::Passed)
}

pub(crate) fn max_amount(application: &Application, value: &RuleValue) -> CheckResult {
    let maximum = value.as_number()?;
    if application.amount_requested > maximum {
        return Ok(RuleCheck::failed(format!(
            "Requested Amount {} exceeds maximum {value}",
            application.amount_requested
        )));
    }
    Ok(RuleCheck::Passed)
}

pub(crate) fn min_amount(application: &Application, value: &RuleValue) -> CheckResult {
    let minimum = value.as_number()?;
    if application.amount_requested < minimum {
        return Ok(RuleCheck::failed(format!(
            "Requested Amount {} is below minimum {value}",
            application.amount_requested
        )));
    }
    Ok(RuleCheck::Passed)
}

/// State codes are compared exactly; intake normalizes them upstream.
pub(crate) fn excluded_states(application: &Application, value: &RuleValue) -> CheckResult {
    let excluded = value.as_list()?;
    if excluded.iter().any(|state| *state == application.state) {
        return Ok(RuleCheck::failed(format!(
            "State {} is in excluded list",
            application.state
        )));
    }
    Ok(RuleCheck::Passed)
}

pub(crate) fn allowed_equipment_types(
    application: &Application,
    value: &RuleValue,
) -> CheckResult {
    let allowed = value.as_list()?;
    if !contains_ignore_case(allowed, &application.equipment_type) {
        return Ok(RuleCheck::failed(format!(
            "Equipment Type {} is not in allowed list",
            application.equipment_type
        )));
    }
    Ok(RuleCheck::Passed)
}

pub(crate) fn excluded_equipment_types(
    application: &Application,
    value: &RuleValue,
) -> CheckResult {
    let excluded = value.as_list()?;
    if contains_ignore_case(excluded, &application.equipment_type) {
        return Ok(RuleCheck::failed(format!(
            "Equipment Type {} is excluded",
            application.equipment_type
        )));
    }
    Ok(RuleCheck::Passed)
}

/// Applications carry no industry yet, so this rule never rejects.
// TODO: compare against an `industry` attribute once intake collects one.
pub(crate) fn excluded_industries(_application: &Application, _value: &RuleValue) -> CheckResult {
    Ok(RuleCheck::Passed)
}

pub(crate) fn min_paynet(application: &Application, value: &RuleValue) -> CheckResult {
    let minimum = value.as_number()?;
    match application.paynet_score {
        None => Ok(RuleCheck::failed("PayNet score is required but missing")),
        Some(score) if f64::from(score) < minimum => Ok(RuleCheck::failed(format!(
            "PayNet Score {score} is below minimum {value}"
        ))),
        Some(_) => Ok(RuleCheck::Passed),
    }
}

fn contains_ignore_case(candidates: &[String], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    candidates
        .iter()
        .any(|candidate| candidate.to_lowercase() == needle)
}
