// Request context unit tests

use std::collections::HashSet;

use utsushi::pipeline::RequestContext;

#[test]
fn test_request_context_includes_request_id() {
    let ctx = RequestContext::new("GET".to_string(), "/issue".to_string());
    // UUID v4 in hyphenated form
    assert_eq!(ctx.request_id().len(), 36);
    assert_eq!(ctx.request_id().matches('-').count(), 4);
}

#[test]
fn test_request_ids_are_unique_across_many_contexts() {
    let ids: HashSet<String> = (0..1000)
        .map(|_| RequestContext::default().request_id().to_string())
        .collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn test_elapsed_grows() {
    let ctx = RequestContext::default();
    let first = ctx.elapsed_ms();
    std::thread::sleep(std::time::Duration::from_millis(2));
    assert!(ctx.elapsed_ms() > first);
}
