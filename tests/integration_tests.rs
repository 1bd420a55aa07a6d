//! Integration tests for bibtex-search
//!
//! These tests drive the real source adapters through the registry against a
//! local mockito server serving captured upstream responses.

use bibtex_search::config::Config;
use bibtex_search::models::SourceKind;
use bibtex_search::sources::{Source, SourceError, SourceRegistry};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const NO_MATCH_QUERY: &str = "35a33f02ce2709d03a97acbc0a73db0d";

const ACM_BAYOU_BIBTEX: &str = r#"@incollection{Terry:1999:MUC:303461.342780,
 author = {Terry, Douglas B. and Theimer, Marvin M. and Peterson, Karin and Demers, Alan J. and Spreitzer, Mike J. and Hauser, Carl H.},
 chapter = {Managing Update Conflicts in Bayou, a Weakly Connected Replicated Storage System},
 title = {Mobility},
 editor = {Miloji\v{c}i\&cacute, Dejan and Douglis, Frederick and Wheeler, Richard},
 year = {1999},
 isbn = {0-201-37928-7},
 pages = {322--334},
 numpages = {13},
 url = {http://dl.acm.org/citation.cfm?id=303461.342780},
 acmid = {342780},
 publisher = {ACM Press/Addison-Wesley Publishing Co.},
 address = {New York, NY, USA},
}"#;

const GOOGLE_BAYOU_BIBTEX: &str = r#"@inproceedings{terry1995managing,
  title={Managing update conflicts in Bayou, a weakly connected replicated storage system},
  author={Terry, Douglas B and Theimer, Marvin M and Petersen, Karin and Demers, Alan J and Spreitzer, Mike J and Hauser, Carl H},
  booktitle={ACM SIGOPS Operating Systems Review},
  volume={29},
  number={5},
  pages={172--182},
  year={1995},
  organization={ACM}
}"#;

const IEEE_SESSION_COOKIE: &str = "JSESSIONID=integration-test";

/// Registry with every endpoint pointed at the mock server
fn registry_for(server: &ServerGuard) -> SourceRegistry {
    let mut config = Config::default();
    config.endpoints.acm = server.url();
    config.endpoints.google_scholar = server.url();
    config.endpoints.ieee = server.url();
    config.ieee.session_cookie = IEEE_SESSION_COOKIE.to_string();
    SourceRegistry::from_config(&config).unwrap()
}

fn acm_export_page(id: &str, bibtex: &str) -> String {
    format!(
        "<html><body><div class=\"export\">\n<pre id=\"{}\">\n{}\n</pre>\n</div></body></html>",
        id,
        bibtex.replace('&', "&amp;")
    )
}

#[tokio::test]
async fn test_acm_search_parses_results() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/results.cfm")
        .match_query(Matcher::UrlEncoded("query".into(), "bayou".into()))
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(
            r#"<html><body>
<div class="details">
  <div class="title"><a href="citation.cfm?id=342780&amp;CFID=1">Managing update conflicts in Bayou</a></div>
  <div class="authors"><a href="author_page.cfm?id=1">Douglas B. Terry</a><a href="author_page.cfm?id=2">Karin Petersen</a></div>
</div>
</body></html>"#,
        )
        .create_async()
        .await;

    let registry = registry_for(&server);
    let articles = registry.search(SourceKind::Acm, "bayou").await.unwrap();

    mock.assert_async().await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id, "342780");
    assert_eq!(articles[0].title, "Managing update conflicts in Bayou");
    assert_eq!(articles[0].authors, "Douglas B. Terry, Karin Petersen");
}

#[tokio::test]
async fn test_acm_retrieve_bayou_reference() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/exportformats.cfm")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "342780".into()),
            Matcher::UrlEncoded("expformat".into(), "bibtex".into()),
        ]))
        .with_status(200)
        .with_body(acm_export_page("342780", ACM_BAYOU_BIBTEX))
        .expect(2)
        .create_async()
        .await;

    let registry = registry_for(&server);
    let first = registry.retrieve(SourceKind::Acm, "342780").await.unwrap();
    let second = registry.retrieve(SourceKind::Acm, "342780").await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, ACM_BAYOU_BIBTEX);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_acm_retrieve_missing_block_is_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/exportformats.cfm")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html><body><p>No export available.</p></body></html>")
        .create_async()
        .await;

    let registry = registry_for(&server);
    let reference = registry.retrieve(SourceKind::Acm, "1").await.unwrap();
    assert_eq!(reference, "");
}

#[tokio::test]
async fn test_acm_server_error_propagates() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/results.cfm")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let registry = registry_for(&server);
    let err = registry.search(SourceKind::Acm, "bayou").await.unwrap_err();
    assert!(matches!(err, SourceError::Api(msg) if msg.contains("503")));
}

#[tokio::test]
async fn test_google_search_parses_results() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/scholar")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "bayou".into()),
            Matcher::UrlEncoded("hl".into(), "en".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"<html><body><div id="gs_res_ccl_mid">
<div class="gs_r gs_or gs_scl" data-cid="PC7aDX_Xk7sJ" data-rp="0">
  <div class="gs_ri">
    <h3 class="gs_rt"><a href="https://dl.acm.org/citation.cfm?id=224070">Managing update conflicts in Bayou, a weakly connected replicated storage system</a></h3>
    <div class="gs_a">DB Terry, MM Theimer, K Petersen - ACM SIGOPS, 1995 - dl.acm.org</div>
  </div>
</div>
</div></body></html>"#,
        )
        .create_async()
        .await;

    let registry = registry_for(&server);
    let articles = registry.search(SourceKind::Google, "bayou").await.unwrap();

    mock.assert_async().await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id, "PC7aDX_Xk7sJ");
    assert!(articles[0].title.starts_with("Managing update conflicts in Bayou"));
    assert!(articles[0].authors.starts_with("DB Terry"));
}

#[tokio::test]
async fn test_google_retrieve_bayou_reference() {
    let mut server = Server::new_async().await;
    let bib_url = format!(
        "{}/scholar.bib?q=info:PC7aDX_Xk7sJ:scholar.google.com/&amp;output=citation&amp;hl=en",
        server.url()
    );

    let cite_mock = server
        .mock("GET", "/scholar")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "info:PC7aDX_Xk7sJ:scholar.google.com/".into()),
            Matcher::UrlEncoded("output".into(), "cite".into()),
        ]))
        .with_status(200)
        .with_body(format!(
            r#"<div id="gs_citt"><table><tr><th>MLA</th><td>Terry, Douglas B., et al.</td></tr></table></div>
<div id="gs_citi"><a class="gs_citi" href="{}">BibTeX</a> <a class="gs_citi" href="/scholar.enw">EndNote</a></div>"#,
            bib_url
        ))
        .create_async()
        .await;

    let bib_mock = server
        .mock("GET", "/scholar.bib")
        .match_query(Matcher::UrlEncoded("output".into(), "citation".into()))
        .with_status(200)
        .with_header("content-type", "text/x-bibtex")
        .with_body(format!("{}\n", GOOGLE_BAYOU_BIBTEX))
        .create_async()
        .await;

    let registry = registry_for(&server);
    let reference = registry
        .retrieve(SourceKind::Google, "PC7aDX_Xk7sJ")
        .await
        .unwrap();

    cite_mock.assert_async().await;
    bib_mock.assert_async().await;
    assert_eq!(reference, GOOGLE_BAYOU_BIBTEX);
}

#[tokio::test]
async fn test_google_retrieve_without_bibtex_link_fails() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/scholar")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html><body>Please show you're not a robot</body></html>")
        .create_async()
        .await;

    let registry = registry_for(&server);
    let err = registry
        .retrieve(SourceKind::Google, "PC7aDX_Xk7sJ")
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Parse(_)));
}

#[tokio::test]
async fn test_ieee_search_sends_only_json_and_cookie() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/search")
        .match_header("cookie", IEEE_SESSION_COOKIE)
        .match_header("referer", Matcher::Missing)
        .match_body(Matcher::Json(json!({"newsearch": true, "queryText": "bayou"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "totalRecords": 1,
                "records": [{
                    "articleNumber": "336552",
                    "articleTitle": "Session guarantees for weakly consistent replicated data",
                    "authors": [
                        {"preferredName": "D.B. Terry"},
                        {"preferredName": "A.J. Demers"},
                        {"preferredName": "K. Petersen"}
                    ]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let registry = registry_for(&server);
    let articles = registry.search(SourceKind::Ieee, "bayou").await.unwrap();

    mock.assert_async().await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id, "336552");
    assert_eq!(articles[0].authors, "D.B. Terry, A.J. Demers, K. Petersen");
}

#[tokio::test]
async fn test_ieee_retrieve_strips_blank_lines() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/xpl/downloadCitations")
        .match_header("cookie", IEEE_SESSION_COOKIE)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("citations-format".into(), "citation-only".into()),
            Matcher::UrlEncoded("download-format".into(), "download-bibtex".into()),
            Matcher::UrlEncoded("recordIds".into(), "336552".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(
            "\r\n\r\n@INPROCEEDINGS{336552, <br>\r\nauthor={D. B. {Terry} and A. J. {Demers}}, <br>\r\n\r\nbooktitle={Proceedings of 3rd International Conference on Parallel and Distributed Information Systems},   <br>\r\n\r\ntitle={Session guarantees for weakly consistent replicated data}, <br>\r\n\r\nyear={1994},  <br>\r\n\r\npages={140-149},}\r\n\r\n\r\n",
        )
        .create_async()
        .await;

    let registry = registry_for(&server);
    let reference = registry.retrieve(SourceKind::Ieee, "336552").await.unwrap();

    mock.assert_async().await;
    assert!(reference.starts_with("@INPROCEEDINGS{336552,"));
    assert!(reference.ends_with("pages={140-149},}"));
    assert_eq!(reference.lines().count(), 6);
    for line in reference.lines() {
        assert!(!line.trim().is_empty(), "blank line in {:?}", reference);
        assert_eq!(line, line.trim_end(), "trailing whitespace in {:?}", line);
    }
}

#[tokio::test]
async fn test_ieee_non_json_response_is_parse_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/rest/search")
        .with_status(200)
        .with_body("<html>Request Rejected</html>")
        .create_async()
        .await;

    let registry = registry_for(&server);
    let err = registry.search(SourceKind::Ieee, "bayou").await.unwrap_err();
    assert!(matches!(err, SourceError::Parse(_)));
}

#[tokio::test]
async fn test_no_matches_is_empty_for_every_source() {
    let mut server = Server::new_async().await;
    let _acm = server
        .mock("GET", "/results.cfm")
        .match_query(Matcher::UrlEncoded("query".into(), NO_MATCH_QUERY.into()))
        .with_status(200)
        .with_body("<html><body><div id=\"results\"></div></body></html>")
        .create_async()
        .await;
    let _google = server
        .mock("GET", "/scholar")
        .match_query(Matcher::UrlEncoded("q".into(), NO_MATCH_QUERY.into()))
        .with_status(200)
        .with_body("<html><body><div id=\"gs_res_ccl_mid\"></div></body></html>")
        .create_async()
        .await;
    let _ieee = server
        .mock("POST", "/rest/search")
        .with_status(200)
        .with_body(json!({"totalRecords": 0}).to_string())
        .create_async()
        .await;

    let registry = registry_for(&server);
    for kind in SourceKind::ALL {
        let articles = registry.search(kind, NO_MATCH_QUERY).await.unwrap();
        assert!(articles.is_empty(), "{} returned {:?}", kind, articles);
    }
}

#[tokio::test]
async fn test_unrecognized_source_name_uses_acm() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/results.cfm")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;

    let registry = registry_for(&server);
    let source = registry.resolve("SPRINGER").unwrap();
    assert_eq!(source.kind(), SourceKind::Acm);
    assert!(source.search("bayou").await.unwrap().is_empty());

    mock.assert_async().await;
}
