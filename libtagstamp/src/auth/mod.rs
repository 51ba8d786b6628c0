//! Authentication handling for container registries.
//!
//! Registries protect their API with the Docker token flow: an
//! unauthenticated request is answered with `401` and a
//! `WWW-Authenticate` challenge naming a token endpoint (`realm`) and a
//! `service`. The client asks that endpoint for a token scoped to the
//! repository and presents it as a bearer credential afterwards.

use crate::error::{Result, TagstampError};
use serde::Deserialize;
use url::Url;


/// Credentials for registry authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication required (anonymous access)
    Anonymous,

    /// HTTP Basic authentication, used to log in to the token endpoint
    Basic {
        /// Username for authentication
        username: String,
        /// Password for authentication
        password: String,
    },

    /// Bearer token issued by the token endpoint
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl Credentials {
    /// Creates anonymous credentials.
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Creates Basic authentication credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libtagstamp::auth::Credentials;
    ///
    /// let creds = Credentials::basic("username", "password");
    /// assert!(creds.to_header_value().unwrap().starts_with("Basic "));
    /// ```
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates Bearer token credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libtagstamp::auth::Credentials;
    ///
    /// let creds = Credentials::bearer("token123");
    /// assert_eq!(creds.to_header_value().unwrap(), "Bearer token123");
    /// ```
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Returns the Authorization header value for these credentials.
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, password } => {
                use base64::{Engine as _, engine::general_purpose};
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {}", encoded))
            }
            Self::Bearer { token } => Some(format!("Bearer {}", token)),
        }
    }
}

/// A Bearer challenge parsed from a `WWW-Authenticate` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChallenge {
    /// The authentication scheme, as written by the registry (e.g. "Bearer")
    pub scheme: String,

    /// URL of the token endpoint
    pub realm: String,

    /// The service identifier to request a token for
    pub service: Option<String>,

    /// The scope the registry suggests, if any
    pub scope: Option<String>,
}

/// One challenge of a `WWW-Authenticate` header, scheme plus raw params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChallenge {
    pub scheme: String,
    /// Parameter names are lowercased; values are unquoted.
    pub params: Vec<(String, String)>,
}

impl RawChallenge {
    /// Returns the value of a parameter, matching the name case-insensitively.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl AuthChallenge {
    /// Parses a `WWW-Authenticate` header value and returns its first Bearer
    /// challenge.
    ///
    /// Example header: `Bearer realm="https://auth.example.com/token",service="registry.example.com",scope="repository:alpine:pull"`
    ///
    /// # Examples
    ///
    /// ```
    /// use libtagstamp::auth::AuthChallenge;
    ///
    /// let header = r#"Bearer realm="https://auth.example.com/token",service="registry""#;
    /// let challenge = AuthChallenge::parse(header).unwrap();
    /// assert_eq!(challenge.realm, "https://auth.example.com/token");
    /// assert_eq!(challenge.service.as_deref(), Some("registry"));
    /// ```
    pub fn parse(header: &str) -> Result<Self> {
        let challenges = parse_challenges(header)?;

        let bearer = challenges
            .iter()
            .find(|c| c.scheme.eq_ignore_ascii_case("bearer"))
            .ok_or_else(|| {
                let offered: Vec<&str> = challenges.iter().map(|c| c.scheme.as_str()).collect();
                TagstampError::authentication(
                    format!(
                        "Registry does not offer Bearer authentication (offered: {})",
                        offered.join(", ")
                    ),
                    Some(401),
                )
            })?;

        let realm = bearer.param("realm").ok_or_else(|| {
            TagstampError::validation("WWW-Authenticate header missing required 'realm' parameter")
        })?;

        Ok(Self {
            scheme: bearer.scheme.clone(),
            realm: realm.to_string(),
            service: bearer.param("service").map(str::to_string),
            scope: bearer.param("scope").map(str::to_string),
        })
    }

    /// Builds the token endpoint URL requesting pull access to `repository`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libtagstamp::auth::AuthChallenge;
    ///
    /// let challenge = AuthChallenge::parse(
    ///     r#"Bearer realm="https://gcr.io/v2/token",service="gcr.io""#,
    /// ).unwrap();
    /// let url = challenge.token_url("team/app").unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://gcr.io/v2/token?service=gcr.io&scope=repository%3Ateam%2Fapp%3Apull"
    /// );
    /// ```
    pub fn token_url(&self, repository: &str) -> Result<Url> {
        let mut url = Url::parse(&self.realm).map_err(|e| {
            TagstampError::validation_with_source(
                format!("Invalid token realm '{}'", self.realm),
                e,
            )
        })?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(service) = &self.service {
                query.append_pair("service", service);
            }
            query.append_pair("scope", &pull_scope(repository));
        }

        Ok(url)
    }
}

/// Scope string granting pull access to a repository.
pub fn pull_scope(repository: &str) -> String {
    format!("repository:{}:pull", repository)
}

/// Parses every challenge in a `WWW-Authenticate` header value.
///
/// Follows the RFC 7235 grammar: challenges are a scheme token followed by
/// comma-separated `name=value` parameters, where a value is a token or a
/// quoted string with backslash escapes.
pub fn parse_challenges(header: &str) -> Result<Vec<RawChallenge>> {
    let mut cursor = Cursor::new(header);
    let mut challenges: Vec<RawChallenge> = Vec::new();

    loop {
        cursor.skip_separators();
        if cursor.is_done() {
            break;
        }

        let start = cursor.pos;
        let name = cursor.token();
        if name.is_empty() {
            return Err(malformed(header, start));
        }

        cursor.skip_whitespace();
        let is_param = cursor.peek() == Some('=') && !challenges.is_empty();

        if is_param {
            cursor.bump();
            cursor.skip_whitespace();
            let value = if cursor.peek() == Some('"') {
                cursor.quoted().ok_or_else(|| malformed(header, start))?
            } else {
                cursor.value_token().to_string()
            };
            if let Some(current) = challenges.last_mut() {
                current.params.push((name.to_ascii_lowercase(), value));
            }
        } else if cursor.peek() == Some('=') {
            // A parameter before any scheme.
            return Err(malformed(header, start));
        } else {
            challenges.push(RawChallenge {
                scheme: name.to_string(),
                params: Vec::new(),
            });
        }
    }

    if challenges.is_empty() {
        return Err(TagstampError::validation(
            "WWW-Authenticate header contains no challenge",
        ));
    }

    Ok(challenges)
}

fn malformed(header: &str, at: usize) -> TagstampError {
    TagstampError::validation(format!(
        "Malformed WWW-Authenticate header at byte {}: {}",
        at, header
    ))
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_done(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !keep(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn skip_separators(&mut self) {
        self.take_while(|c| c.is_whitespace() || c == ',');
    }

    /// Scheme or parameter name.
    fn token(&mut self) -> &'a str {
        self.take_while(|c| !c.is_whitespace() && c != ',' && c != '=' && c != '"')
    }

    /// Unquoted parameter value; may contain `=` (token68 padding).
    fn value_token(&mut self) -> &'a str {
        self.take_while(|c| !c.is_whitespace() && c != ',')
    }

    /// Quoted string starting at the opening quote. `None` if unterminated.
    fn quoted(&mut self) -> Option<String> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump()? {
                '"' => return Some(value),
                '\\' => value.push(self.bump()?),
                c => value.push(c),
            }
        }
    }
}

/// Response body of the token endpoint.
///
/// The distribution token protocol returns the credential as `token`; OAuth2
/// style endpoints use `access_token`. Expiry fields are informational only.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub access_token: Option<String>,

    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,

    #[serde(default)]
    pub issued_at: Option<String>,
}

impl TokenResponse {
    /// Turns the response into bearer credentials, preferring `token`.
    pub fn into_credentials(self) -> Result<Credentials> {
        self.token
            .or(self.access_token)
            .filter(|t| !t.is_empty())
            .map(Credentials::bearer)
            .ok_or_else(|| {
                TagstampError::authentication("Token endpoint response missing 'token' field", None)
            })
    }
}
