use std::path::{Path, PathBuf};

use unionize_core::{
    config::{NewForConfig, Sources, UnionizeConfig},
    generate::{Generation, files::MemCollector},
    value::{UnionType, Value},
};
use unionize_errors::Span;

const SAMPLES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../samples");

fn samples() -> Generation {
    unionize_testing::logging();

    let mut config = UnionizeConfig::new(Some(SAMPLES)).unwrap();
    config.sources = Sources {
        include: vec![format!("{SAMPLES}/src/*.toml")],
        exclude: vec![],
    };
    config.set_mem(true);
    Generation::new(config).unwrap()
}

#[test]
fn sample_config() {
    let config = UnionizeConfig::new(Some(SAMPLES)).unwrap();
    assert_eq!(config.output_dir, PathBuf::from("generated"));
    assert_eq!(config.sources.include, vec!["samples/src/*.toml".to_string()]);
}

#[test]
fn generates_every_sample_union() {
    let generation = samples();
    let collector = MemCollector::new();

    let written = generation
        .generate_all(Some(collector.mem_flush()))
        .unwrap();
    assert_eq!(
        written,
        vec![
            PathBuf::from("generated/Demo.Shape.g.cs"),
            PathBuf::from("generated/Demo.Option_T_.g.cs"),
            PathBuf::from("generated/Demo.Token.g.cs"),
        ]
    );

    let option = collector
        .text("generated/Demo.Option_T_.g.cs")
        .unwrap();
    assert!(option.contains("public partial class Option<T> : System.IEquatable<Option<T>>"));
    assert!(option.contains("public static Option<T> Some(T value)"));
    assert!(option.contains("public static readonly Option<T> None = new Option<T>(Tag.None);"));

    let token = collector
        .text("generated/Demo.Token.g.cs")
        .unwrap();
    assert!(token.contains("public partial struct Token : System.IEquatable<Token>"));
}

#[test]
fn checks_sample_program() {
    let generation = samples();

    let found = generation.check();
    assert_eq!(
        found
            .iter()
            .map(|err| (err.error_code().to_string(), err.span()))
            .collect::<Vec<_>>(),
        vec![
            ("DU1".to_string(), Some(Span::new(12, 26))),
            ("DU1".to_string(), Some(Span::new(72, 77))),
        ]
    );
}

#[test]
fn fixes_sample_program() {
    let generation = samples();
    let path = Path::new(SAMPLES).join("src/program.toml");

    let fixed = generation.fix(&path).unwrap();
    assert!(fixed.text.contains(
        "Shape.Circle(2.0).Match(Circle: r => r * r * 3.14, Square: arg => throw new System.NotImplementedException());"
    ));
    assert!(fixed.diagnostics.is_empty());
    assert_eq!(
        fixed.slice(fixed.invocations[1].span),
        Some(r#"Option<string>.Some("x").Match(Some: v => v, None: () => "")"#)
    );

    let rendered = fixed.render().unwrap();
    assert!(rendered.contains("Square: arg => throw new System.NotImplementedException()"));
}

#[test]
fn every_case_round_trips() {
    let generation = samples();
    let extraction = generation.extract();
    assert!(extraction.failures.is_empty());

    for union in &extraction.unions {
        let ty = UnionType::new(union);
        for case in &union.cases {
            let args = (0..case.arity())
                .map(|i| Value::Int(i as i64 + 1))
                .collect::<Vec<_>>();
            let value = ty
                .construct(&case.name, args.clone())
                .unwrap();
            assert_eq!(value, ty.construct(&case.name, args.clone()).unwrap());

            let mut matcher = value.matcher();
            for other in &union.cases {
                let name = other.name.clone();
                matcher = matcher.on(&other.name, move |payload| (name, payload.to_vec()));
            }
            assert_eq!(matcher.run().unwrap(), (case.name.clone(), args));

            for other in union
                .cases
                .iter()
                .filter(|other| other.name != case.name)
            {
                let args = vec![Value::Int(1); other.arity()];
                assert_ne!(value, ty.construct(&other.name, args).unwrap());
            }
        }
    }
}
