use dtgen_core::model::{
    DataType, ListType, NameRegistry, Names, NamesOptions, NamesSource, SelectionBounds, SelectionSpec,
    WeightedCandidateSet, WeightedList, WeightedListOptions, WeightedSampler, EXAMPLES,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Candidates and their weights: "blue" is three times as likely as "red",
    // "grey" has weight 0 and is never selected
    let mut values = WeightedCandidateSet::new();
    values.insert("red", 1.0)?;
    values.insert("green", 2.0)?;
    values.insert("blue", 3.0)?;
    values.insert("grey", 0.0)?;

    // Negative weights are rejected up front
    match values.insert("black", -1.0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected: {}", e),
    }

    // A seeded sampler gives the same output on every run
    let mut sampler = WeightedSampler::seeded(2024);

    // Selection modes
    // 'Exactly' draws a fixed count (capped by the pool without duplicates)
    // 'Between' draws a count uniformly in [low, high]
    // 'AtLeast' draws in [low, pool size], nothing if the pool is too small
    // 'AtMost' draws in [0, high]
    for spec in [
        SelectionSpec::Exactly(2),
        SelectionSpec::Between(1, 3),
        SelectionSpec::AtLeast(2),
        SelectionSpec::AtLeast(10),
        SelectionSpec::AtMost(2),
    ] {
        let drawn = sampler.sample(&values, &spec, false);
        println!("{:?}: {:?}", spec, drawn);
    }

    // With duplicates, candidates stay in the pool
    println!("With duplicates: {:?}", sampler.draw_weighted_subset(&values, 6, true));

    // The WeightedList data type works from the row state saved by the editor
    let options = WeightedListOptions {
        bounds: SelectionBounds {
            list_type: ListType::Between,
            exactly: None,
            between_low: Some(1),
            between_high: Some(3),
        },
        values: values.clone(),
        delimiter: " | ".to_owned(),
        allow_duplicates: false,
    };
    for i in 0..5 {
        println!("WeightedList row {}: {}", i + 1, WeightedList.generate(&options, sampler.rng())?.display);
    }

    // Inverted ranges are a configuration error
    let inverted = SelectionBounds { list_type: ListType::Between, exactly: None, between_low: Some(5), between_high: Some(2) };
    match inverted.to_spec() {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected: {}", e),
    }

    // Names: load country banks if the data folder exists
    let registry = NameRegistry::load_dir("./data/names").unwrap_or_default();
    println!("Country name banks: {:?}", registry.country_codes());
    let names = Names::new(registry);

    for example in EXAMPLES {
        let options = NamesOptions::from_example(example.value);
        println!("{:<28} {}", example.label, names.generate(&options, sampler.rng())?.display);
    }

    let mut options = NamesOptions::from_example("Name Surname");
    options.source = NamesSource::Countries;
    options.selected_countries.insert("fr".to_owned());
    options.selected_countries.insert("jp".to_owned());
    for i in 0..5 {
        println!("Regional name {}: {}", i + 1, names.generate(&options, sampler.rng())?.display);
    }

    let sql = names.metadata().sql;
    println!("SQL columns: {} / {} / {}", sql.field, sql.field_oracle, sql.field_mssql);

    Ok(())
}
