//! # End-to-End Tests
//!
//! Full lifecycle through the public API: create authors and papers, query
//! the citation graph, then reopen the backing file and verify everything
//! survived the round trip.

use scholia_core::{
    ListOptions, NewAuthor, NewPaper, Repository, SortField, list_papers, paper_citations,
    topic_experts,
};

fn bschack() -> NewAuthor {
    NewAuthor {
        username: "bschack".to_string(),
        first_name: "Ben".to_string(),
        last_name: "Schack".to_string(),
        institution: "Lehigh".to_string(),
    }
}

#[test]
fn citation_lifecycle_survives_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("research-graph.ttl");

    let mut repo = Repository::open(&path).expect("open");
    repo.create_author(bschack()).expect("author");

    let basic = repo
        .create_paper(NewPaper {
            title: "Basic ML".to_string(),
            author_usernames: vec!["bschack".to_string()],
            topics: vec!["Machine Learning".to_string()],
            publication_date: Some("2022-03-21".to_string()),
            citations: vec![],
        })
        .expect("first paper");
    assert_eq!(basic.id, 1);

    let advanced = repo
        .create_paper(NewPaper {
            title: "Advanced ML".to_string(),
            author_usernames: vec!["bschack".to_string()],
            topics: vec!["Machine Learning".to_string()],
            publication_date: Some("2023-01-10".to_string()),
            citations: vec![1],
        })
        .expect("second paper");
    assert_eq!(advanced.id, 2);

    // Forward edge: the new paper's details carry the citation
    let details = repo.paper_details(2).expect("details");
    assert_eq!(details.citations, vec![1]);

    // Reverse edge: the cited paper sees its citer
    let citers = paper_citations(repo.store(), 1);
    assert_eq!(citers.len(), 1);
    assert_eq!(citers[0].id, 2);
    assert_eq!(citers[0].title.as_deref(), Some("Advanced ML"));

    // Everything must survive a cold reload from disk
    drop(repo);
    let reloaded = Repository::open(&path).expect("reopen");

    let details = reloaded.paper_details(2).expect("details after reload");
    assert_eq!(details.title.as_deref(), Some("Advanced ML"));
    assert_eq!(details.citations, vec![1]);
    assert_eq!(details.authors.len(), 1);
    assert_eq!(details.authors[0].username, "bschack");

    let citers = paper_citations(reloaded.store(), 1);
    assert_eq!(citers.len(), 1);
    assert_eq!(citers[0].id, 2);

    let experts = topic_experts(reloaded.store(), "Machine Learning");
    assert_eq!(experts.len(), 1);
    assert_eq!(experts[0].username, "bschack");

    let listing = list_papers(
        reloaded.store(),
        ListOptions {
            sort_by: SortField::Date,
            descending: true,
        },
    );
    let ids: Vec<_> = listing.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1]);

    // Ids keep counting from where the reloaded graph left off
    assert_eq!(reloaded.next_paper_id(), 3);
}

#[test]
fn failed_mutation_leaves_file_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("research-graph.ttl");

    let mut repo = Repository::open(&path).expect("open");
    repo.create_author(bschack()).expect("author");
    let on_disk = std::fs::read_to_string(&path).expect("read");

    let err = repo.create_paper(NewPaper {
        title: "Orphan".to_string(),
        author_usernames: vec!["nobody".to_string()],
        topics: vec!["Machine Learning".to_string()],
        publication_date: None,
        citations: vec![],
    });
    assert!(err.is_err());

    assert_eq!(std::fs::read_to_string(&path).expect("reread"), on_disk);
}
