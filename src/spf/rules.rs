//! SPF scoring rules.
//!
//! Rule order fixes the order of warnings and recommendations in the report.

use super::record::{MechanismKind, Qualifier, SpfRecord};
use crate::config::{
    SPF_LOOKUP_NOTICE_THRESHOLD, SPF_LOOKUP_WARNING_THRESHOLD, SPF_MAX_LOOKUPS,
    SPF_MAX_RECORD_LENGTH,
};
use crate::scoring::{RuleOutcome, ScoringRule};

/// A parsed SPF record in the context of the domain it was published for.
pub struct SpfContext {
    pub domain: String,
    pub record: SpfRecord,
    pub lookups: usize,
}

impl SpfContext {
    pub fn new(domain: &str, record: SpfRecord) -> Self {
        let lookups = record.lookup_count();
        Self {
            domain: domain.to_string(),
            record,
            lookups,
        }
    }
}

pub const SPF_RULES: &[ScoringRule<SpfContext>] = &[
    ScoringRule::new("redirect-target", redirect_target),
    ScoringRule::new("valid-record", valid_record),
    ScoringRule::new("policy-strength", policy_strength),
    ScoringRule::new("no-deprecated-ptr", no_deprecated_ptr),
    ScoringRule::new("explicit-mechanisms", explicit_mechanisms),
    ScoringRule::new("lookup-budget", lookup_budget),
    ScoringRule::new("record-hygiene", record_hygiene),
];

fn redirect_target(ctx: &SpfContext) -> RuleOutcome {
    match ctx.record.redirect_target() {
        Some(target) => RuleOutcome::none().recommend(format!(
            "SPF evaluation is redirected to {target}; keep that record maintained, it defines this domain's policy"
        )),
        None => RuleOutcome::none(),
    }
}

fn valid_record(_: &SpfContext) -> RuleOutcome {
    RuleOutcome::award(1.0, "Single valid SPF record (+1)")
}

fn policy_strength(ctx: &SpfContext) -> RuleOutcome {
    let Some(policy) = ctx.record.policy() else {
        return RuleOutcome::none()
            .warn("No 'all' mechanism found; unlisted senders get no explicit result")
            .recommend("End the SPF record with ~all or -all to define how unlisted senders are treated");
    };
    match policy.qualifier {
        Qualifier::Pass => RuleOutcome::award(0.0, "+all policy (+0)")
            .warn("+all allows any server on the internet to send mail as this domain (dangerous)")
            .recommend("Replace +all with ~all or -all immediately"),
        Qualifier::Neutral => RuleOutcome::award(0.5, "?all neutral policy (+0.5)")
            .warn("?all (neutral) provides no protection against spoofing")
            .recommend("Replace ?all with ~all or -all"),
        Qualifier::SoftFail => RuleOutcome::award(1.5, "~all soft fail policy (+1.5)").recommend(
            "~all (soft fail) is acceptable; consider -all once every legitimate sender is listed",
        ),
        Qualifier::Fail => RuleOutcome::award(2.0, "-all hard fail policy (+2)")
            .recommend("-all (hard fail) gives the strongest protection; keep the sender list current"),
    }
}

fn no_deprecated_ptr(ctx: &SpfContext) -> RuleOutcome {
    let uses_ptr = ctx
        .record
        .mechanisms
        .iter()
        .any(|m| m.kind == MechanismKind::Ptr);
    if uses_ptr {
        RuleOutcome::none().warn(
            "The ptr mechanism is deprecated (RFC 7208 Section 5.5): it is slow, unreliable and may be ignored by receivers",
        )
    } else {
        RuleOutcome::award(0.5, "No deprecated ptr mechanism (+0.5)")
    }
}

fn explicit_mechanisms(ctx: &SpfContext) -> RuleOutcome {
    if ctx.record.mechanisms.iter().any(|m| m.is_bare()) {
        RuleOutcome::none().recommend(
            "Bare 'a' or 'mx' mechanisms cost extra DNS lookups on every check; list ip4/ip6 ranges for better performance",
        )
    } else {
        RuleOutcome::none()
    }
}

fn lookup_budget(ctx: &SpfContext) -> RuleOutcome {
    let lookups = ctx.lookups;
    if lookups > SPF_MAX_LOOKUPS {
        RuleOutcome::none()
            .warn_first(format!(
                "Fatal: SPF record needs {lookups} DNS lookups, exceeding the RFC 7208 limit of {SPF_MAX_LOOKUPS}; receivers will return permerror"
            ))
            .recommend_first(
                "Reduce DNS lookups by flattening include chains or replacing a/mx mechanisms with ip4/ip6 ranges",
            )
    } else if lookups > SPF_LOOKUP_WARNING_THRESHOLD {
        RuleOutcome::award(1.0, format!("{lookups} DNS lookups, within the limit (+1)")).warn(
            format!(
                "SPF record uses {lookups} of {SPF_MAX_LOOKUPS} allowed DNS lookups and is close to the limit"
            ),
        )
    } else if lookups > SPF_LOOKUP_NOTICE_THRESHOLD {
        RuleOutcome::award(1.0, format!("{lookups} DNS lookups, within the limit (+1)")).recommend(
            format!("SPF record uses {lookups} DNS lookups; monitor it as included records change"),
        )
    } else {
        RuleOutcome::award(1.0, format!("{lookups} DNS lookups, within the limit (+1)"))
    }
}

fn record_hygiene(ctx: &SpfContext) -> RuleOutcome {
    let length = ctx.record.raw.chars().count();
    let self_include = ctx
        .record
        .includes()
        .any(|target| target.eq_ignore_ascii_case(&ctx.domain));

    let mut outcome = if length <= SPF_MAX_RECORD_LENGTH && !self_include {
        RuleOutcome::award(0.5, "Record length and includes are sound (+0.5)")
    } else {
        RuleOutcome::none()
    };
    if length > SPF_MAX_RECORD_LENGTH {
        outcome = outcome
            .warn(format!(
                "SPF record is {length} characters long; TXT strings over {SPF_MAX_RECORD_LENGTH} characters must be split and some receivers mishandle them"
            ))
            .recommend("Shorten the SPF record or consolidate includes to avoid TXT chunking problems");
    }
    if self_include {
        outcome = outcome
            .warn(format!(
                "SPF record includes its own domain ({}), creating a lookup loop",
                ctx.domain
            ))
            .recommend("Remove the include mechanism that points back to this domain");
    }
    outcome
}
