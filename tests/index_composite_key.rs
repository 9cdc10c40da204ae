use linhash::{composite_key, CompositeKey, LinHashMap, StableKey};
use test_log::test;

#[test]
fn index_composite_movie_keys() -> linhash::Result<()> {
    let films: [(&str, i32, i64); 5] = [
        ("Star_Wars", 1977, 124),
        ("Star_Wars_2", 1980, 124),
        ("Rocky", 1985, 200),
        ("Rambo", 1978, 100),
        ("Galaxy_Quest", 1999, 104),
    ];

    let mut movies: LinHashMap<CompositeKey, i64> = LinHashMap::new();

    for (title, year, length) in films {
        assert_eq!(None, movies.put(composite_key![title, year], length)?);
    }

    for (title, year, length) in films {
        assert_eq!(Some(&length), movies.get(&composite_key![title, year]));
    }

    assert_eq!(None, movies.get(&composite_key!["Star_Wars", 1980]));
    assert_eq!(5, movies.population());

    // Re-inserting an equal key overwrites
    assert_eq!(Some(200), movies.put(composite_key!["Rocky", 1985], 201)?);
    assert_eq!(5, movies.population());

    movies.verify()
}

#[test]
fn index_composite_many_keys() -> linhash::Result<()> {
    let mut stars: LinHashMap<CompositeKey, usize> = LinHashMap::new();

    for i in 0..1_000u32 {
        stars.put(composite_key![format!("star_{i}"), 'F', i64::from(i)], i as usize)?;
    }

    for i in 0..1_000u32 {
        assert_eq!(
            Some(&(i as usize)),
            stars.get(&composite_key![format!("star_{i}"), 'F', i64::from(i)])
        );
    }

    stars.verify()
}

#[test]
fn index_stable_key_tuples() -> linhash::Result<()> {
    let mut starring = LinHashMap::new();

    starring.put(StableKey(("Star_Wars", 1977, "Carrie_Fisher")), ())?;
    starring.put(StableKey(("Star_Wars", 1977, "Mark_Hamill")), ())?;

    assert!(starring.contains_key(&StableKey(("Star_Wars", 1977, "Mark_Hamill"))));
    assert!(!starring.contains_key(&StableKey(("Star_Wars", 1977, "Harrison_Ford"))));

    Ok(())
}
