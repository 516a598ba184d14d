//! AWS Signature Version 4 request signing.
//!
//! Only what the search call needs: a single request with a fully buffered
//! body, headers signed as given.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::config::AwsCredentials;
use crate::error::TransportError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Scope of a signature: region and service
pub struct Signer<'a> {
    pub credentials: &'a AwsCredentials,
    pub region: &'a str,
    pub service: &'a str,
}

impl Signer<'_> {
    /// Sign a request and return the headers to add to it.
    ///
    /// `headers` are the caller's headers that must be covered by the
    /// signature; `host`, `x-amz-date` and the session token are added here.
    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &[(&str, &str)],
        body: &[u8],
        time: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, TransportError> {
        let amz_date = time.format("%Y%m%dT%H%M%SZ").to_string();
        let date = time.format("%Y%m%d").to_string();

        let host = match url.port() {
            Some(port) => format!("{}:{}", host_str(url)?, port),
            None => host_str(url)?.to_string(),
        };

        let mut added = vec![("x-amz-date".to_string(), amz_date.clone())];
        if let Some(token) = &self.credentials.session_token {
            added.push(("x-amz-security-token".to_string(), token.clone()));
        }

        let mut signed: Vec<(String, String)> = headers
            .iter()
            .map(|(name, value)| (name.to_lowercase(), value.trim().to_string()))
            .chain(std::iter::once(("host".to_string(), host)))
            .chain(added.iter().cloned())
            .collect();
        signed.sort();

        let signed_headers = signed
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let canonical_headers: String = signed
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method,
            canonical_uri(url),
            canonical_query(url),
            canonical_headers,
            signed_headers,
            hex::encode(Sha256::digest(body)),
        );

        let scope = format!("{}/{}/{}/aws4_request", date, self.region, self.service);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes())),
        );

        let key = self.signing_key(&date)?;
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

        added.push((
            "authorization".to_string(),
            format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.credentials.access_key_id, scope, signed_headers, signature
            ),
        ));
        Ok(added)
    }

    fn signing_key(&self, date: &str) -> Result<Vec<u8>, TransportError> {
        let secret = format!("AWS4{}", self.credentials.secret_access_key);
        let k_date = hmac_sha256(secret.as_bytes(), date.as_bytes())?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, self.service.as_bytes())?;
        hmac_sha256(&k_service, b"aws4_request")
    }
}

fn host_str(url: &Url) -> Result<&str, TransportError> {
    url.host_str()
        .ok_or_else(|| TransportError::Signing(format!("no host in {}", url)))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, TransportError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| TransportError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Path with every segment encoded once more, as required outside S3
fn canonical_uri(url: &Url) -> String {
    let path = url.path();
    if path.is_empty() || path == "/" {
        return "/".to_string();
    }
    path.split('/')
        .map(uri_encode)
        .collect::<Vec<_>>()
        .join("/")
}

fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn uri_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn example_credentials(session_token: Option<&str>) -> AwsCredentials {
        AwsCredentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            session_token: session_token.map(str::to_string),
        }
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    // Published example: IAM ListUsers, 2015-08-30T12:36:00Z
    #[test]
    fn test_reference_signature() {
        let credentials = example_credentials(None);
        let signer = Signer {
            credentials: &credentials,
            region: "us-east-1",
            service: "iam",
        };
        let url =
            Url::parse("https://iam.amazonaws.com/?Action=ListUsers&Version=2010-05-08").unwrap();
        let time = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();

        let headers = signer
            .sign(
                "GET",
                &url,
                &[("Content-Type", "application/x-www-form-urlencoded; charset=utf-8")],
                b"",
                time,
            )
            .unwrap();

        assert_eq!(header(&headers, "x-amz-date"), Some("20150830T123600Z"));
        assert_eq!(
            header(&headers, "authorization"),
            Some(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/iam/aws4_request, \
                 SignedHeaders=content-type;host;x-amz-date, \
                 Signature=5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7"
            )
        );
    }

    #[test]
    fn test_session_token_is_signed() {
        let credentials = example_credentials(Some("session-token"));
        let signer = Signer {
            credentials: &credentials,
            region: "us-west-2",
            service: "geo",
        };
        let url =
            Url::parse("http://127.0.0.1:8080/places/v0/indexes/AddressIndex/search/text").unwrap();
        let time = Utc.with_ymd_and_hms(2025, 5, 30, 0, 0, 0).unwrap();

        let headers = signer
            .sign(
                "POST",
                &url,
                &[("content-type", "application/json")],
                b"{}",
                time,
            )
            .unwrap();

        assert_eq!(
            header(&headers, "x-amz-security-token"),
            Some("session-token")
        );
        let authorization = header(&headers, "authorization").unwrap();
        assert!(
            authorization.contains("Credential=AKIDEXAMPLE/20250530/us-west-2/geo/aws4_request")
        );
        assert!(
            authorization
                .contains("SignedHeaders=content-type;host;x-amz-date;x-amz-security-token")
        );
    }

    #[test]
    fn test_uri_encoding() {
        assert_eq!(uri_encode("Address Index"), "Address%20Index");
        assert_eq!(uri_encode("a~b_c-d.e"), "a~b_c-d.e");
        assert_eq!(uri_encode("92021/1"), "92021%2F1");
    }
}
