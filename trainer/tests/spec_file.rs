use std::path::Path;

use trainer::{TrainErr, specs::TrainerSpec, training::TrainerBuilder};

fn bundled_spec() -> TrainerSpec {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("linear.json");
    TrainerSpec::load(path).unwrap()
}

#[test]
fn bundled_spec_trains_the_line() {
    let spec = bundled_spec();
    let mut trainer = TrainerBuilder::new().build(&spec).unwrap();

    let losses = trainer.train().unwrap();
    assert_eq!(losses.len(), spec.epochs.get());
    assert!(losses.last().unwrap() < &0.01, "losses: {losses:?}");

    // y = 2 x - 1
    let params = trainer.params().groups()[0].params();
    let w = params[0].value()[[0, 0]];
    let b = params[1].value()[0];
    assert!((w - 2.).abs() < 0.2, "w = {w}");
    assert!((b + 1.).abs() < 0.2, "b = {b}");
}

#[test]
fn missing_spec_file_is_an_io_error() {
    let err = TrainerSpec::load("does/not/exist.json").unwrap_err();
    assert!(matches!(err, TrainErr::Io(_)));
}
