use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    Author, Criterion, CrudOperations, QueryError, RepoError, SqliteAuthorRepository,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashSet;
use uuid::Uuid;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn author(id: &str, name: &str, birth_date: NaiveDate) -> Author {
    Author::new(id, name, birth_date)
}

fn author_jjr() -> Author {
    author("author1_id", "JJR", date(2000, 1, 1))
}

fn author_rado() -> Author {
    author("author2_id", "Rado", date(1990, 1, 1))
}

fn seeded_catalog(conn: &mut Connection, authors: &[Author]) {
    let mut repo = SqliteAuthorRepository::try_new(conn).unwrap();
    repo.save_all(authors).unwrap();
}

fn is_sorted_by<K: Ord>(authors: &[Author], key: impl Fn(&Author) -> K) -> bool {
    authors.windows(2).all(|pair| key(&pair[0]) <= key(&pair[1]))
}

#[test]
fn filter_matches_name_fragment_or_birth_date() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(&mut conn, &[author_jjr(), author_rado()]);
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let criteria = [
        Criterion::name_contains("rado"),
        Criterion::birth_date_on(date(2000, 1, 1)),
    ];

    // Rado matches the name fragment, JJR matches the date; ordered by name.
    let actual = repo.find_by_criteria(&criteria, 1, 2, Some("name")).unwrap();
    assert_eq!(actual, vec![author_jjr(), author_rado()]);
}

#[test]
fn filtered_results_satisfy_the_documented_predicate() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(
        &mut conn,
        &[
            author_jjr(),
            author_rado(),
            author("author3_id", "Someone Else", date(1975, 3, 3)),
        ],
    );
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let criteria = [
        Criterion::name_contains("rado"),
        Criterion::birth_date_on(date(2000, 1, 1)),
    ];

    let actual = repo.find_by_criteria(&criteria, 1, 10, Some("name")).unwrap();

    assert!(!actual.is_empty());
    assert!(actual.iter().all(|row| {
        row.name.to_lowercase().contains("rado") || row.birth_date == date(2000, 1, 1)
    }));
    assert!(!actual.iter().any(|row| row.id == "author3_id"));
}

#[test]
fn multiple_name_fragments_narrow_each_other() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(
        &mut conn,
        &[
            author("r1", "Rado", date(1990, 1, 1)),
            author("r2", "Radu", date(1991, 1, 1)),
            author("d1", "Dora", date(1992, 1, 1)),
        ],
    );
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let criteria = [Criterion::name_contains("ra"), Criterion::name_contains("do")];
    let actual = repo.find_by_criteria(&criteria, 1, 10, Some("name")).unwrap();

    // Both fragments must match: Radu has no "do".
    let names: Vec<_> = actual.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["Dora", "Rado"]);
}

#[test]
fn name_match_is_case_insensitive() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(&mut conn, &[author_rado()]);
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let shouting = [Criterion::name_contains("RADO")];
    let actual = repo.find_by_criteria(&shouting, 1, 10, None).unwrap();
    assert_eq!(actual, vec![author_rado()]);
}

#[test]
fn like_wildcards_in_fragments_match_literally() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(
        &mut conn,
        &[
            author("p1", "50% Off Press", date(1980, 5, 5)),
            author("p2", "Plain Name", date(1981, 6, 6)),
        ],
    );
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let percent = [Criterion::name_contains("%")];
    let actual = repo.find_by_criteria(&percent, 1, 10, None).unwrap();

    let ids: Vec<_> = actual.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["p1"]);
}

#[test]
fn empty_criteria_behave_like_get_all() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(&mut conn, &[author_jjr(), author_rado()]);
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let filtered = repo.find_by_criteria(&[], 1, 10, Some("name")).unwrap();
    let all = repo.get_all(1, 10, Some("name")).unwrap();
    assert_eq!(filtered, all);
    assert_eq!(all.len(), 2);
}

#[test]
fn get_all_pages_single_rows_in_name_order() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(&mut conn, &[author_jjr(), author_rado()]);
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let first = repo.get_all(1, 1, Some("name")).unwrap();
    assert_eq!(first, vec![author_jjr()]);

    let second = repo.get_all(2, 1, Some("name")).unwrap();
    assert_eq!(second, vec![author_rado()]);
}

#[test]
fn pages_are_bounded_and_disjoint() {
    let mut conn = open_db_in_memory().unwrap();
    let seed: Vec<Author> = (1..=5)
        .map(|index| {
            author(
                &format!("s{index}"),
                &format!("Author {index:02}"),
                date(1950 + index, 1, 1),
            )
        })
        .collect();
    seeded_catalog(&mut conn, &seed);
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let first = repo.get_all(1, 2, Some("name")).unwrap();
    let second = repo.get_all(2, 2, Some("name")).unwrap();
    let third = repo.get_all(3, 2, Some("name")).unwrap();

    assert!(first.len() <= 2 && second.len() <= 2 && third.len() <= 2);

    let mut seen: HashSet<String> = HashSet::new();
    for row in first.iter().chain(&second).chain(&third) {
        assert!(seen.insert(row.id.clone()), "row {} appeared twice", row.id);
    }
    assert_eq!(seen.len(), seed.len());
}

#[test]
fn page_past_the_end_is_empty() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(&mut conn, &[author_jjr()]);
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let far_page = repo.get_all(5, 10, Some("name")).unwrap();
    assert!(far_page.is_empty());
}

#[test]
fn order_by_single_and_composite_columns() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(
        &mut conn,
        &[
            author("o1", "Banana Yoshimoto", date(1964, 7, 24)),
            author("o2", "Albert Camus", date(1913, 11, 7)),
            author("o3", "Albert Camus", date(1960, 1, 4)),
        ],
    );
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let by_name = repo.get_all(1, 10, Some("name")).unwrap();
    assert!(is_sorted_by(&by_name, |row| row.name.clone()));

    let by_birth_date = repo.get_all(1, 10, Some("birth_date")).unwrap();
    assert!(is_sorted_by(&by_birth_date, |row| row.birth_date));

    let composite = repo.get_all(1, 10, Some("name, birth_date")).unwrap();
    assert!(is_sorted_by(&composite, |row| (
        row.name.clone(),
        row.birth_date
    )));
}

#[test]
fn order_by_descending_direction() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(&mut conn, &[author_jjr(), author_rado()]);
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let descending = repo.get_all(1, 10, Some("name desc")).unwrap();
    assert_eq!(descending, vec![author_rado(), author_jjr()]);
}

#[test]
fn page_zero_is_rejected_with_offending_value() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let err = repo.get_all(0, 10, None).unwrap_err();
    match err {
        RepoError::InvalidQuery(QueryError::InvalidPage(0)) => {}
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn page_size_zero_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let err = repo.get_all(1, 0, None).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidQuery(QueryError::InvalidPageSize(0))
    ));
}

#[test]
fn unknown_sort_column_is_rejected_by_read_paths() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(&mut conn, &[author_jjr()]);
    let repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let err = repo.get_all(1, 10, Some("surname")).unwrap_err();
    match err {
        RepoError::InvalidQuery(QueryError::UnknownSortColumn(token)) => {
            assert_eq!(token, "surname");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = repo
        .find_by_criteria(&[], 1, 10, Some("name; DROP TABLE authors"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidQuery(QueryError::UnknownSortColumn(_))
    ));
}

#[test]
fn freshly_inserted_author_is_visible_exactly_once() {
    let mut conn = open_db_in_memory().unwrap();
    seeded_catalog(&mut conn, &[author_jjr(), author_rado()]);
    let mut repo = SqliteAuthorRepository::try_new(&mut conn).unwrap();

    let newcomer = author(&Uuid::new_v4().to_string(), "Newcomer", date(1999, 9, 9));
    repo.save_all(std::slice::from_ref(&newcomer)).unwrap();

    let all = repo.get_all(1, 50, Some("name")).unwrap();
    let occurrences = all.iter().filter(|row| row.id == newcomer.id).count();
    assert_eq!(occurrences, 1);
}
