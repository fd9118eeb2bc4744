use actix_web::HttpRequest;

/// Extract the client's IP address from the request.
/// `trust_proxy_headers`: whether to trust the first X-Forwarded-For entry.
pub fn get_client_ip(req: &HttpRequest, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(forwarded) = req.headers().get("x-forwarded-for") {
            if let Ok(s) = forwarded.to_str() {
                let first = s.split(',').next().unwrap_or("").trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn forwarded_header_wins_when_trusted() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.9, 10.0.0.1"))
            .to_http_request();
        assert_eq!(get_client_ip(&req, true), "203.0.113.9");
    }

    #[test]
    fn forwarded_header_ignored_when_untrusted() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.9"))
            .peer_addr("192.0.2.4:45000".parse().unwrap())
            .to_http_request();
        assert_eq!(get_client_ip(&req, false), "192.0.2.4");
    }

    #[test]
    fn missing_peer_addr_falls_back_to_unknown() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(get_client_ip(&req, false), "unknown");
    }
}
