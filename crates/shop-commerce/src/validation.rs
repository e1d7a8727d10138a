//! Form validation helpers.
//!
//! Forms are validated rule by rule; every failing rule contributes its
//! message and the caller gets them all at once, joined with `", "`.

use crate::error::CommerceError;

/// Collects failing rule messages for one form.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` unless `ok` holds.
    pub fn check(&mut self, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(message.into());
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish validation.
    pub fn finish(self) -> Result<(), CommerceError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::Validation(self.errors.join(", ")))
        }
    }
}

/// URL check: an `http` or `https` scheme followed by an authority with a
/// real host. Userinfo and a numeric port are allowed; hosts are dotted
/// labels of letters, digits and `-`, or a bracketed IPv6 address.
pub fn is_valid_url(candidate: &str) -> bool {
    let rest = candidate
        .strip_prefix("https://")
        .or_else(|| candidate.strip_prefix("http://"));
    let Some(rest) = rest else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host_port = match authority.rsplit_once('@') {
        Some((userinfo, host_port)) if !userinfo.is_empty() => host_port,
        Some(_) => return false,
        None => authority,
    };

    let (host, port) = if let Some(v6) = host_port.strip_prefix('[') {
        let Some((addr, after)) = v6.split_once(']') else {
            return false;
        };
        if addr.is_empty() || !addr.chars().all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.') {
            return false;
        }
        match after {
            "" => return true,
            _ => match after.strip_prefix(':') {
                Some(port) => (addr, Some(port)),
                None => return false,
            },
        }
    } else {
        match host_port.split_once(':') {
            Some((host, port)) => {
                if !is_valid_host(host) {
                    return false;
                }
                (host, Some(port))
            }
            None => {
                if !is_valid_host(host_port) {
                    return false;
                }
                (host_port, None)
            }
        }
    };

    !host.is_empty() && port.map_or(true, |p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && host.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_joins_messages() {
        let mut v = Validator::new();
        v.check(false, "name too short").check(true, "unused").check(false, "price must be positive");
        let err = v.finish().unwrap_err();
        assert_eq!(
            err,
            CommerceError::Validation("name too short, price must be positive".to_string())
        );
    }

    #[test]
    fn test_validator_ok() {
        let mut v = Validator::new();
        v.check(true, "never");
        assert!(v.is_valid());
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://img.clerk.com/abc.png"));
        assert!(is_valid_url("http://localhost:3000"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("not a url"));
    }

    #[test]
    fn test_url_host_must_be_real() {
        assert!(is_valid_url("https://user:pw@cdn.example.com/a.png"));
        assert!(is_valid_url("http://[::1]:8080/health"));
        assert!(is_valid_url("https://[2001:db8::1]"));
        assert!(!is_valid_url("https://:::"));
        assert!(!is_valid_url("https://@"));
        assert!(!is_valid_url("https://@example.com"));
        assert!(!is_valid_url("https://example..com"));
        assert!(!is_valid_url("https://.example.com"));
        assert!(!is_valid_url("https://example.com:"));
        assert!(!is_valid_url("https://example.com:80a"));
        assert!(!is_valid_url("https://exa mple.com"));
        assert!(!is_valid_url("https://[::1"));
    }
}
