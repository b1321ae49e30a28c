//! File-name template expansion.
//!
//! Turns a template string containing `{yyyy} {mm} {dd} {cc} {hh} {fhr}
//! {member}` tokens plus a concrete date/fhr/member into a literal path.
//! A known token left unresolved after substitution is a
//! [`Template`](crate::Error::Template) error; unknown brace tokens pass
//! through untouched. Pure string manipulation, no I/O.

use crate::app::models::parse_date_key;
use crate::constants::{DEFAULT_CYCLE, TEMPLATE_TOKENS};
use crate::Result;
use crate::Error;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Matches any known token remaining after substitution
fn known_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"\{{({})\}}", TEMPLATE_TOKENS.join("|"));
        Regex::new(&pattern).unwrap()
    })
}

/// Concrete values for one leaf file of a load traversal.
///
/// `fhr` and `member` strings arrive already zero-padded by the axis
/// layer; calendar fields carry their fixed widths (yyyy=4, others 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    yyyy: String,
    mm: String,
    dd: String,
    cc: String,
    fhr: Option<String>,
    member: Option<String>,
}

impl TemplateContext {
    /// Build a context from a `YYYYMMDD[CC]` date key.
    ///
    /// A missing cycle defaults to `00`.
    pub fn for_date(date_key: &str) -> Result<Self> {
        let (_, cycle) = parse_date_key(date_key)?;
        Ok(Self {
            yyyy: date_key[0..4].to_string(),
            mm: date_key[4..6].to_string(),
            dd: date_key[6..8].to_string(),
            cc: cycle.unwrap_or_else(|| DEFAULT_CYCLE.to_string()),
            fhr: None,
            member: None,
        })
    }

    /// Build a context from an `MMDD` day-of-year key (climatology files).
    ///
    /// Year and cycle stay unbound; templates using `{yyyy}`, `{cc}` or
    /// `{hh}` will fail expansion, which is the correct signal for a
    /// mis-specified climatology template.
    pub fn for_day(day_key: &str) -> Result<Self> {
        crate::app::models::parse_day_key(day_key)?;
        Ok(Self {
            yyyy: String::new(),
            mm: day_key[0..2].to_string(),
            dd: day_key[2..4].to_string(),
            cc: String::new(),
            fhr: None,
            member: None,
        })
    }

    /// Attach a (pre-padded) forecast-hour value
    pub fn with_fhr(mut self, fhr: impl Into<String>) -> Self {
        self.fhr = Some(fhr.into());
        self
    }

    /// Attach a (pre-padded) ensemble-member value
    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }
}

/// Expand a file-name template with the given context.
///
/// Returns the literal path, or a template error naming the first known
/// token that had no substitution value.
pub fn expand(template: &str, ctx: &TemplateContext) -> Result<PathBuf> {
    let mut path = template.to_string();
    if !ctx.yyyy.is_empty() {
        path = path.replace("{yyyy}", &ctx.yyyy);
    }
    path = path.replace("{mm}", &ctx.mm).replace("{dd}", &ctx.dd);
    if !ctx.cc.is_empty() {
        // {hh} is an alias for the cycle hour
        path = path.replace("{cc}", &ctx.cc).replace("{hh}", &ctx.cc);
    }
    if let Some(fhr) = &ctx.fhr {
        path = path.replace("{fhr}", fhr);
    }
    if let Some(member) = &ctx.member {
        path = path.replace("{member}", member);
    }

    if let Some(m) = known_token_re().find(&path) {
        return Err(Error::template(format!(
            "no value supplied for token '{}' in template '{}'",
            m.as_str(),
            template
        )));
    }
    Ok(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_date_round_trip() {
        let ctx = TemplateContext::for_date("20160515").unwrap();
        let path = expand("{yyyy}{mm}{dd}", &ctx).unwrap();
        assert_eq!(path, PathBuf::from("20160515"));
    }

    #[test]
    fn test_expand_full_forecast_path() {
        let ctx = TemplateContext::for_date("2016051512")
            .unwrap()
            .with_fhr("006")
            .with_member("01");
        let path = expand(
            "/data/gefs/{yyyy}/{mm}/{dd}/gefs_{yyyy}{mm}{dd}_{cc}z_f{fhr}_m{member}.grb2",
            &ctx,
        )
        .unwrap();
        assert_eq!(
            path,
            PathBuf::from("/data/gefs/2016/05/15/gefs_20160515_12z_f006_m01.grb2")
        );
    }

    #[test]
    fn test_default_cycle_is_00() {
        let ctx = TemplateContext::for_date("20160515").unwrap();
        let path = expand("{cc}z_{hh}", &ctx).unwrap();
        assert_eq!(path, PathBuf::from("00z_00"));
    }

    #[test]
    fn test_unresolved_known_token_is_error() {
        let ctx = TemplateContext::for_date("20160515").unwrap();
        let err = expand("obs_{yyyy}{mm}{dd}_m{member}.bin", &ctx).unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
        assert!(err.to_string().contains("{member}"));
    }

    #[test]
    fn test_unknown_token_passes_through() {
        let ctx = TemplateContext::for_date("20160515").unwrap();
        let path = expand("{model}/obs_{yyyy}.bin", &ctx).unwrap();
        assert_eq!(path, PathBuf::from("{model}/obs_2016.bin"));
    }

    #[test]
    fn test_day_context_binds_month_day_only() {
        let ctx = TemplateContext::for_day("0515").unwrap();
        let path = expand("climo_{mm}{dd}.bin", &ctx).unwrap();
        assert_eq!(path, PathBuf::from("climo_0515.bin"));

        let err = expand("climo_{yyyy}{mm}{dd}.bin", &ctx).unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }

    #[test]
    fn test_invalid_date_key_rejected() {
        assert!(TemplateContext::for_date("2016-05-15").is_err());
        assert!(TemplateContext::for_day("13").is_err());
    }
}
