//! Lists the time entries of a business.

use std::io::Write;

use anyhow::{Context, Result};
use fb_api::{Client, Filters, Prompter, Transport};

use crate::commands::lookup;

pub fn run<W, T, P>(
    writer: &mut W,
    client: &Client<T>,
    prompter: &mut P,
    business_name: &str,
    client_id: Option<i64>,
) -> Result<()>
where
    W: Write,
    T: Transport,
    P: Prompter + ?Sized,
{
    let business = lookup::find_business(client, business_name, prompter)?;
    let filters = client_id.map(|id| Filters::new().with("client_id", id));
    let result = client
        .fetch_time_entries(business.id, filters.as_ref())
        .with_context(|| format!("failed to fetch time entries for \"{}\"", business.name))?;

    let rendered = serde_json::to_string_pretty(&result).context("failed to render response")?;
    writeln!(writer, "{rendered}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;

    use fb_api::{ApiError, HttpRequest, HttpResponse};
    use insta::assert_snapshot;
    use serde_json::json;

    use super::*;

    struct FakeService {
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl Transport for FakeService {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request.clone());
            let body = if request.url.ends_with("/users/me") {
                json!({"response": {"business_memberships": [
                    {"business": {"id": 10, "name": "Biz", "account_id": "acc1"}}
                ]}})
            } else {
                json!({"response": {"result": {
                    "time_entries": [{"id": 1, "duration": 600}],
                    "meta": {"page": 1, "pages": 1}
                }}})
            };
            Ok(HttpResponse {
                status: 200,
                body: body.to_string(),
            })
        }
    }

    struct NeverPrompt;

    impl Prompter for NeverPrompt {
        fn choose(&mut self, listing: &str) -> io::Result<usize> {
            panic!("unexpected prompt:\n{listing}");
        }
    }

    #[test]
    fn prints_time_entries_of_business() {
        let service = FakeService {
            requests: RefCell::new(Vec::new()),
        };
        let client = Client::with_transport(&service, "http://fake", "abc").unwrap();
        let mut output = Vec::new();

        run(&mut output, &client, &mut NeverPrompt, "Biz", Some(3)).unwrap();

        let requests = service.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].url,
            "http://fake/timetracking/business/10/time_entries"
        );
        assert_eq!(
            requests[1].query,
            Some(vec![("client_id".to_string(), "3".to_string())])
        );

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r#"
        {
          "time_entries": [
            {
              "id": 1,
              "duration": 600
            }
          ],
          "meta": {
            "page": 1,
            "pages": 1
          }
        }
        "#);
    }

    #[test]
    fn no_client_filter_sends_no_query() {
        let service = FakeService {
            requests: RefCell::new(Vec::new()),
        };
        let client = Client::with_transport(&service, "http://fake", "abc").unwrap();

        run(&mut Vec::new(), &client, &mut NeverPrompt, "Biz", None).unwrap();

        assert!(service.requests.borrow()[1].query.is_none());
    }
}
