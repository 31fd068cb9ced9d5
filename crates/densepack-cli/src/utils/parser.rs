use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid target '{0}'. Expected 'SITE' or 'SITE:INDEX' (e.g., 'e:0').")]
    InvalidTarget(String),

    #[error("Invalid site seed '{0}'. Expected 'SITE' or 'SITE=v1,v2,...' (e.g., 'e=0.25').")]
    InvalidSiteSeed(String),

    #[error("Invalid number '{value}' in '{input}'.")]
    InvalidNumber { input: String, value: String },

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),
}

/// Parses `SITE` or `SITE:INDEX`; the index defaults to 0.
pub fn parse_target(input: &str) -> Result<(String, usize), ParseError> {
    let invalid = || ParseError::InvalidTarget(input.to_string());
    let (site, index) = match input.split_once(':') {
        Some((site, index)) => (site, index.parse().map_err(|_| invalid())?),
        None => (input, 0),
    };
    if site.is_empty() {
        return Err(invalid());
    }
    Ok((site.to_string(), index))
}

/// Parses a comma-separated list of floats. An empty string is an empty list.
pub fn parse_values(input: &str) -> Result<Vec<f64>, ParseError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .map(|value| {
            value.trim().parse().map_err(|_| ParseError::InvalidNumber {
                input: input.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// Parses `SITE` or `SITE=v1,v2,...` into a site name and its free parameters.
pub fn parse_site_seed(input: &str) -> Result<(String, Vec<f64>), ParseError> {
    let (site, values) = input.split_once('=').unwrap_or((input, ""));
    if site.is_empty() {
        return Err(ParseError::InvalidSiteSeed(input.to_string()));
    }
    Ok((site.to_string(), parse_values(values)?))
}

pub fn parse_key_value(input: &str) -> Result<(&str, &str), ParseError> {
    input
        .split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| ParseError::InvalidKeyValue(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_without_index_defaults_to_zero() {
        assert_eq!(parse_target("e"), Ok(("e".to_string(), 0)));
        assert_eq!(parse_target("f:2"), Ok(("f".to_string(), 2)));
    }

    #[test]
    fn target_rejects_bad_index_and_empty_site() {
        assert_eq!(
            parse_target("e:x"),
            Err(ParseError::InvalidTarget("e:x".to_string()))
        );
        assert_eq!(
            parse_target(":1"),
            Err(ParseError::InvalidTarget(":1".to_string()))
        );
    }

    #[test]
    fn site_seed_parses_values() {
        assert_eq!(
            parse_site_seed("e=0.25, 0.5"),
            Ok(("e".to_string(), vec![0.25, 0.5]))
        );
        assert_eq!(parse_site_seed("a"), Ok(("a".to_string(), vec![])));
        assert_eq!(parse_site_seed("a="), Ok(("a".to_string(), vec![])));
    }

    #[test]
    fn site_seed_rejects_bad_numbers() {
        assert!(matches!(
            parse_site_seed("e=0.1,abc"),
            Err(ParseError::InvalidNumber { value, .. }) if value == "abc"
        ));
        assert!(matches!(
            parse_site_seed("=0.1"),
            Err(ParseError::InvalidSiteSeed(_))
        ));
    }

    #[test]
    fn key_value_splits_on_first_equals() {
        assert_eq!(
            parse_key_value("sites.e.parameters=0.1,0.2"),
            Ok(("sites.e.parameters", "0.1,0.2"))
        );
        assert_eq!(parse_key_value("a=b=c"), Ok(("a", "b=c")));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=1").is_err());
    }
}
