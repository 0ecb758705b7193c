//! OAuth authorization-code exchange.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use fb_api::Transport;
use fb_api::oauth::{self, AccessToken, AuthorizationRequest, Credentials};

use crate::commands::util::humanize;
use crate::prompt::TerminalPrompter;

/// Walks the user through authorization and prints the resulting token.
pub fn run<W, T, R, E>(
    writer: &mut W,
    transport: &T,
    prompter: &mut TerminalPrompter<R, E>,
    credentials: &Credentials,
) -> Result<AccessToken>
where
    W: Write,
    T: Transport + ?Sized,
    R: BufRead,
    E: Write,
{
    let request = AuthorizationRequest::new(&credentials.client_id, &credentials.redirect_url)
        .context("failed to build authorization URL")?;

    writeln!(writer, "Visit the following URL to authorize access to FreshBooks:")?;
    writeln!(writer, "{}", request.url)?;
    writeln!(
        writer,
        "You will most likely be redirected to a non-existent page, which is OK. \
         Be sure to copy the URL that you’re redirected to, we’ll need it for the next step."
    )?;
    writer.flush()?;

    let response = prompter
        .ask("Paste the response URL")
        .context("failed to read the response URL")?;
    let code = request.code_from_redirect(&response)?;
    let token = oauth::exchange_code(transport, credentials, &code)?;

    display_token(writer, &token)?;
    Ok(token)
}

fn display_token<W: Write>(writer: &mut W, token: &AccessToken) -> Result<()> {
    writeln!(writer, "Access token: {}", token.access_token)?;
    writeln!(
        writer,
        "Expires {} at {}",
        humanize(token.expires_at - Utc::now()),
        token.expires_at.with_timezone(&Local).to_rfc3339()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use fb_api::{ApiError, HttpRequest, HttpResponse};

    use super::*;

    struct TokenEndpoint {
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl Transport for TokenEndpoint {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request.clone());
            Ok(HttpResponse {
                status: 200,
                body: r#"{"access_token":"tok-123","token_type":"bearer","expires_in":43200}"#
                    .to_string(),
            })
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
            redirect_url: "https://localhost/callback".to_string(),
        }
    }

    #[test]
    fn rejects_redirect_from_another_flow() {
        let endpoint = TokenEndpoint {
            requests: RefCell::new(Vec::new()),
        };
        let mut prompter = TerminalPrompter::new(
            &b"https://localhost/callback?code=abc&state=stale\n"[..],
            Vec::new(),
        );
        let mut output = Vec::new();

        let err = run(&mut output, &endpoint, &mut prompter, &credentials()).unwrap_err();

        assert!(err.to_string().contains("state mismatch"));
        assert!(endpoint.requests.borrow().is_empty());
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("client_id=cid"));
        assert!(output.contains(oauth::AUTHORIZE_URL));
    }

    #[test]
    fn displays_token_and_expiry() {
        let token = AccessToken {
            access_token: "tok-123".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: None,
            expires_at: Utc::now() + chrono::Duration::hours(12) + chrono::Duration::seconds(30),
        };
        let mut output = Vec::new();
        display_token(&mut output, &token).unwrap();
        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Access token: tok-123");
        assert!(lines[1].starts_with("Expires in 12 hours at "));
    }
}
