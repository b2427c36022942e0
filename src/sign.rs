// src/sign.rs

use crate::constants;
use md5::{Digest, Md5};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 与表单编码 (quote_plus) 一致: 仅保留字母数字与 `-_.~`，空格稍后替换为 `+`
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b' ');

pub const APPKEY_PARAM: &str = "appkey";
pub const SIGN_PARAM: &str = "sign";

/// 签名所需的应用凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredentials {
    pub appkey: String,
    pub appsec: String,
}

impl Default for AppCredentials {
    fn default() -> Self {
        Self {
            appkey: constants::APPKEY.to_string(),
            appsec: constants::APPSEC.to_string(),
        }
    }
}

fn form_encode(s: &str) -> String {
    utf8_percent_encode(s, FORM_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
}

/// 将参数按 key 排序后序列化为查询字符串
pub fn encode_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// 为 API 请求参数追加 `appkey` 与 `sign`，返回新的参数表。
///
/// 参数先按 key 的字典序排列再编码，因此结果与插入顺序无关。
pub fn app_sign<'a, I>(params: I, credentials: &AppCredentials) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut signed: BTreeMap<String, String> = params
        .into_iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    signed.insert(APPKEY_PARAM.to_string(), credentials.appkey.clone());

    let query = encode_query(&signed);
    let mut hasher = Md5::new();
    hasher.update(query.as_bytes());
    hasher.update(credentials.appsec.as_bytes());
    let sign = hex::encode(hasher.finalize());

    signed.insert(SIGN_PARAM.to_string(), sign);
    signed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn creds(key: &str, sec: &str) -> AppCredentials {
        AppCredentials {
            appkey: key.to_string(),
            appsec: sec.to_string(),
        }
    }

    fn md5_hex(input: &str) -> String {
        hex::encode(Md5::digest(input.as_bytes()))
    }

    #[test]
    fn test_sign_matches_manual_digest() {
        let params = HashMap::from([("foo".to_string(), "bar".to_string())]);
        let signed = app_sign(&params, &creds("K", "S"));

        assert_eq!(signed.get("appkey").map(String::as_str), Some("K"));
        assert_eq!(signed.get("foo").map(String::as_str), Some("bar"));
        assert_eq!(
            signed.get("sign").cloned(),
            Some(md5_hex("appkey=K&foo=barS"))
        );
        assert_eq!(signed.len(), 3);
    }

    #[test]
    fn test_sign_with_builtin_credentials() {
        let params = HashMap::from([("foo".to_string(), "bar".to_string())]);
        let signed = app_sign(&params, &AppCredentials::default());
        assert_eq!(
            signed.get("sign").map(String::as_str),
            Some("2ebc3b75ff882316cb2f99128ac6ce42")
        );
    }

    #[test]
    fn test_sign_encodes_like_form_urlencoded() {
        let params = HashMap::from([
            ("season_id".to_string(), "28770".to_string()),
            ("a b".to_string(), "x~y*z/".to_string()),
        ]);
        let signed = app_sign(&params, &AppCredentials::default());

        let mut unsigned = signed.clone();
        unsigned.remove("sign");
        assert_eq!(
            encode_query(&unsigned),
            "a+b=x~y%2Az%2F&appkey=4409e2ce8ffd12b8&season_id=28770"
        );
        assert_eq!(
            signed.get("sign").map(String::as_str),
            Some("b4b672b67fa38323b90d61dcd80ddb3f")
        );
    }

    #[test]
    fn test_sign_is_insertion_order_independent() {
        let forward: Vec<(String, String)> = vec![
            ("ep_id".into(), "1".into()),
            ("cid".into(), "2".into()),
            ("qn".into(), "80".into()),
        ];
        let backward: Vec<(String, String)> = forward.iter().rev().cloned().collect();

        let a = app_sign(forward.iter().map(|(k, v)| (k, v)), &creds("K", "S"));
        let b = app_sign(backward.iter().map(|(k, v)| (k, v)), &creds("K", "S"));
        assert_eq!(a, b);
        assert_eq!(a, app_sign(forward.iter().map(|(k, v)| (k, v)), &creds("K", "S")));
    }

    #[test]
    fn test_sign_keeps_every_input_key_and_does_not_mutate_input() {
        let params = HashMap::from([
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]);
        let snapshot = params.clone();
        let signed = app_sign(&params, &creds("K", "S"));

        assert_eq!(params, snapshot);
        for key in params.keys() {
            assert!(signed.contains_key(key));
        }
        assert!(signed.contains_key(APPKEY_PARAM));
        assert!(signed.contains_key(SIGN_PARAM));
        assert_eq!(signed.len(), params.len() + 2);
    }
}
