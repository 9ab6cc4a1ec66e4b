//! Route pattern compilation.
//!
//! # Syntax
//! - Static text is matched literally.
//! - `{name}` captures one path segment.
//! - `{name<regex>}` constrains the parameter inline; the route's
//!   `requirements` table is used otherwise.
//! - `{name?}` and `{name?default}` declare optional parameters.
//!
//! A trailing run of parameters that have a default (or are declared optional)
//! can be left out of the path together with their leading `/`.

use std::collections::{BTreeSet, HashSet};

use regex::Regex;

use crate::error::{RoutingError, RoutingResult};
use crate::routing::definition::{Params, RouteDefinition};

const DEFAULT_REQUIREMENT: &str = "[^/]+";

#[derive(Debug, Clone)]
enum Token {
    Text(String),
    Variable(Variable),
}

#[derive(Debug, Clone)]
struct Variable {
    /// Separator preceding the variable (`/` or empty).
    prefix: String,
    name: String,
    requirement: String,
    /// Anchored requirement used to validate generated values.
    check: Regex,
}

/// A route path compiled for both matching and generation.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    tokens: Vec<Token>,
    regex: Regex,
    defaults: Params,
    /// Optional parameters without a default value.
    optional: BTreeSet<String>,
}

struct Placeholder<'a> {
    name: &'a str,
    requirement: Option<&'a str>,
    optional: bool,
    default: Option<&'a str>,
}

impl CompiledPattern {
    /// Compile the path of a route definition.
    pub fn compile(route: &RouteDefinition) -> RoutingResult<Self> {
        let path = if route.path.starts_with('/') {
            route.path.clone()
        } else {
            format!("/{}", route.path)
        };

        let mut defaults = route.defaults.clone();
        let mut optional = BTreeSet::new();
        let mut tokens = Vec::new();
        let mut seen = HashSet::new();
        let mut rest = path.as_str();

        while let Some(open) = rest.find('{') {
            let mut text = &rest[..open];
            let (placeholder, after) =
                parse_placeholder(&rest[open + 1..]).map_err(|reason| invalid(route, reason))?;

            let prefix = match text.strip_suffix('/') {
                Some(stripped) => {
                    text = stripped;
                    "/"
                }
                None => "",
            };
            if !text.is_empty() {
                tokens.push(Token::Text(text.to_string()));
            }

            let name = placeholder.name.to_string();
            if !seen.insert(name.clone()) {
                return Err(invalid(route, format!("parameter \"{}\" is used more than once", name)));
            }

            let requirement = placeholder
                .requirement
                .map(str::to_string)
                .or_else(|| route.requirements.get(&name).cloned())
                .unwrap_or_else(|| DEFAULT_REQUIREMENT.to_string());
            let requirement = requirement
                .trim_start_matches('^')
                .trim_end_matches('$')
                .to_string();
            let check = Regex::new(&format!("^(?:{})$", requirement))
                .map_err(|e| invalid(route, format!("requirement for \"{}\": {}", name, e)))?;

            if let Some(default) = placeholder.default {
                defaults.insert(name.clone(), default.to_string());
            } else if placeholder.optional && !defaults.contains_key(&name) {
                optional.insert(name.clone());
            }

            tokens.push(Token::Variable(Variable {
                prefix: prefix.to_string(),
                name,
                requirement,
                check,
            }));
            rest = after;
        }
        if !rest.is_empty() {
            tokens.push(Token::Text(rest.to_string()));
        }

        let mut first_optional = tokens.len();
        for (index, token) in tokens.iter().enumerate().rev() {
            match token {
                Token::Variable(v) if defaults.contains_key(&v.name) || optional.contains(&v.name) => {
                    first_optional = index;
                }
                _ => break,
            }
        }

        let regex = Regex::new(&build_regex(&tokens, first_optional))
            .map_err(|e| invalid(route, e.to_string()))?;

        Ok(Self {
            tokens,
            regex,
            defaults,
            optional,
        })
    }

    /// Names of the parameters used in the path, in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Variable(v) => Some(v.name.as_str()),
            Token::Text(_) => None,
        })
    }

    /// Match a canonical path, returning the extracted parameters merged over
    /// the route defaults.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        let mut params = self.defaults.clone();
        for name in self.variables() {
            if let Some(value) = captures.name(name) {
                params.insert(name.to_string(), value.as_str().to_string());
            }
        }
        Some(params)
    }

    /// Substitute parameters into the pattern.
    ///
    /// Returns the path and the parameters the pattern did not consume
    /// (callers append those as a query string).
    pub fn expand(&self, route: &str, params: &Params) -> RoutingResult<(String, Params)> {
        let value_of = |name: &str| params.get(name).or_else(|| self.defaults.get(name));

        let missing: Vec<String> = self
            .variables()
            .filter(|name| value_of(name).is_none() && !self.optional.contains(*name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(RoutingError::MissingParameters {
                route: route.to_string(),
                missing,
            });
        }

        let mut url = String::new();
        let mut optional = true;
        for token in self.tokens.iter().rev() {
            match token {
                Token::Text(text) => {
                    url.insert_str(0, text);
                    optional = false;
                }
                Token::Variable(v) => {
                    let value = value_of(&v.name);
                    let skippable = optional
                        && (self.defaults.contains_key(&v.name) || self.optional.contains(&v.name));
                    let is_default = value.is_none() || value == self.defaults.get(&v.name);
                    if skippable && is_default {
                        continue;
                    }

                    let value = value.ok_or_else(|| RoutingError::MissingParameters {
                        route: route.to_string(),
                        missing: vec![v.name.clone()],
                    })?;
                    if !v.check.is_match(value) {
                        return Err(RoutingError::InvalidParameter {
                            route: route.to_string(),
                            parameter: v.name.clone(),
                            value: value.clone(),
                            requirement: v.requirement.clone(),
                        });
                    }
                    url.insert_str(0, value);
                    url.insert_str(0, &v.prefix);
                    optional = false;
                }
            }
        }
        if url.is_empty() {
            url.push('/');
        }

        let variables: HashSet<&str> = self.variables().collect();
        let extra = params
            .iter()
            .filter(|(name, value)| {
                !variables.contains(name.as_str()) && self.defaults.get(*name) != Some(*value)
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok((url, extra))
    }
}

fn invalid(route: &RouteDefinition, reason: impl Into<String>) -> RoutingError {
    RoutingError::InvalidPattern {
        route: route.name.clone(),
        reason: reason.into(),
    }
}

/// Parse the text following a `{`. Returns the placeholder and the input
/// remaining after the closing `}`.
fn parse_placeholder(input: &str) -> Result<(Placeholder<'_>, &str), String> {
    let name_len = input
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(input.len());
    let name = &input[..name_len];
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(format!("invalid parameter name at \"{{{}\"", input));
    }

    let mut rest = &input[name_len..];
    let mut requirement = None;
    if let Some(after) = rest.strip_prefix('<') {
        let end = after
            .match_indices('>')
            .map(|(i, _)| i)
            .find(|&i| matches!(after[i + 1..].chars().next(), Some('}') | Some('?')))
            .ok_or_else(|| format!("unterminated constraint for \"{}\"", name))?;
        requirement = Some(&after[..end]);
        rest = &after[end + 1..];
    }

    let mut optional = false;
    let mut default = None;
    if let Some(after) = rest.strip_prefix('?') {
        let end = after
            .find('}')
            .ok_or_else(|| format!("unclosed placeholder \"{}\"", name))?;
        optional = true;
        if end > 0 {
            default = Some(&after[..end]);
        }
        rest = &after[end..];
    }

    let rest = rest
        .strip_prefix('}')
        .ok_or_else(|| format!("unclosed placeholder \"{}\"", name))?;

    Ok((
        Placeholder {
            name,
            requirement,
            optional,
            default,
        },
        rest,
    ))
}

fn build_regex(tokens: &[Token], first_optional: usize) -> String {
    let count = tokens.len();
    let mut source = String::from("^");
    for (index, token) in tokens.iter().enumerate() {
        // A lone optional variable keeps its separator mandatory.
        let leading_optional = index == 0 && first_optional == 0;
        let piece = match token {
            Token::Text(text) => regex::escape(text),
            Token::Variable(v) if leading_optional => format!(
                "{}(?P<{}>{})?",
                regex::escape(&v.prefix),
                v.name,
                v.requirement
            ),
            Token::Variable(v) => format!(
                "{}(?P<{}>{})",
                regex::escape(&v.prefix),
                v.name,
                v.requirement
            ),
        };

        if index >= first_optional && !leading_optional {
            source.push_str("(?:");
        }
        source.push_str(&piece);
        if index + 1 == count && first_optional < count {
            let closes = count - first_optional - usize::from(first_optional == 0);
            source.push_str(&")?".repeat(closes));
        }
    }
    source.push('$');
    source
}
