use katyusha::{
    OptErr,
    optimization::{Katyusha, Snapshot},
    params::{Param, ParamGroup, ParamSet},
};
use ndarray::{ArrayD, IxDyn};

const EPS: f32 = 1e-5;

fn scalar_set(value: f32, grad: Option<f32>) -> ParamSet {
    let value = ArrayD::from_elem(IxDyn(&[1]), value);
    let param = match grad {
        Some(g) => Param::with_grad(value, ArrayD::from_elem(IxDyn(&[1]), g)).unwrap(),
        None => Param::new(value),
    };

    ParamSet::new(vec![ParamGroup::new(vec![param])])
}

fn first(set: &ParamSet) -> f32 {
    set.groups()[0].params()[0].value()[0]
}

/// Gradient of `0.5 * a * (w - c)^2` for a sample `(a, c)`.
fn sample_grad(set: &mut ParamSet, samples: &[(f32, f32)]) {
    for (_, p) in set.params_mut() {
        let w = p.value()[0];
        let g = samples.iter().map(|(a, c)| a * (w - c)).sum::<f32>() / samples.len() as f32;
        p.set_grad(Some(ArrayD::from_elem(IxDyn(&[1]), g))).unwrap();
    }
}

#[test]
fn single_step_matches_the_worked_example() {
    // lips = 10, tau_1 = 0.5 => alpha = 1 / 15
    let mut opt = Katyusha::new(10., 2).unwrap();
    opt.set_outparam(&scalar_set(10., Some(2.))).unwrap();
    assert!((opt.alpha() - 1. / 15.).abs() < EPS);

    // with x_tilde = z_k = 10, x_k = 0.5 * 10 + 0.5 * 10 = 10
    opt.compute_xk().unwrap();
    assert_eq!(first(opt.current_iterate().unwrap()), 10.);

    opt.load_grads(&scalar_set(10., Some(3.))).unwrap();
    opt.step(&scalar_set(10., Some(1.))).unwrap();

    let y = first(opt.output_iterate().unwrap());
    let z = first(opt.momentum_iterate().unwrap());
    let avg = first(opt.get_param_groups().unwrap());

    assert!((y - 9.866_667).abs() < EPS, "y_k = {y}");
    assert!((z - (10. - 4. / 15.)).abs() < EPS, "z_k = {z}");
    assert!((avg - 9.866_667 / 2.).abs() < EPS, "avg_y = {avg}");
}

#[test]
fn manual_driver_follows_the_epoch_protocol() {
    let samples = [(1.0, 2.0), (2.0, -1.0), (0.5, 4.0), (1.5, 0.0)];
    let lips = 2.0;
    let m = 8;

    let mut model = scalar_set(0., None);
    let mut snapshot = Snapshot::new(model.clone());
    let mut opt = Katyusha::new(lips, m).unwrap();

    let full_loss = |set: &ParamSet| {
        let w = first(set);
        samples.iter().map(|(a, c)| 0.5 * a * (w - c).powi(2)).sum::<f32>() / samples.len() as f32
    };
    let initial_loss = full_loss(snapshot.get_param_groups());

    for epoch in 0..10 {
        // EPOCH_START
        sample_grad(snapshot.get_param_groups_mut(), &samples);
        opt.set_outparam(snapshot.get_param_groups()).unwrap();
        assert_eq!(opt.epoch(), epoch + 1);
        assert!(opt.get_param_groups().unwrap().params().all(|(_, p)| p.value()[0] == 0.));

        // INNER_LOOP
        let mut at_snapshot = opt.snapshot_point().unwrap().value_copy();
        let mut ys = Vec::with_capacity(m);
        for i in 0..m {
            opt.compute_xk().unwrap();
            model.copy_values_from(opt.current_iterate().unwrap()).unwrap();

            let batch = [samples[i % samples.len()]];
            sample_grad(&mut model, &batch);
            opt.load_grads(&model).unwrap();

            sample_grad(&mut at_snapshot, &batch);
            opt.step(&at_snapshot).unwrap();

            ys.push(first(opt.output_iterate().unwrap()));
        }

        // EPOCH_END
        let avg = opt.get_param_groups().unwrap();
        let mean = ys.iter().sum::<f32>() / m as f32;
        assert!((first(avg) - mean).abs() < EPS);

        snapshot.set_param_groups(avg).unwrap();
        assert_eq!(first(snapshot.get_param_groups()), first(avg));
    }

    let final_loss = full_loss(snapshot.get_param_groups());
    assert!(final_loss < initial_loss, "{final_loss} >= {initial_loss}");
}

#[test]
fn snapshot_point_is_decoupled_from_the_caller() {
    let mut opt = Katyusha::new(3., 1).unwrap();
    let mut params = scalar_set(5., Some(1.));

    opt.set_outparam(&params).unwrap();
    params.params_mut().for_each(|(_, p)| p.value_mut().fill(-1.));

    assert_eq!(first(opt.snapshot_point().unwrap()), 5.);
    assert_eq!(first(opt.current_iterate().unwrap()), 5.);
    assert_eq!(first(opt.output_iterate().unwrap()), 5.);
    assert_eq!(first(opt.momentum_iterate().unwrap()), 5.);
}

#[test]
fn misuse_is_reported() {
    let mut opt = Katyusha::new(3., 1).unwrap();

    assert_eq!(opt.compute_xk(), Err(OptErr::NotInitialized));
    assert_eq!(
        opt.set_outparam(&scalar_set(1., None)),
        Err(OptErr::MissingGradient { group: 0, param: 0 })
    );

    opt.set_outparam(&scalar_set(1., Some(0.))).unwrap();

    let two = ParamSet::new(vec![
        ParamGroup::new(vec![Param::zeros(&[1])]),
        ParamGroup::new(vec![Param::zeros(&[1])]),
    ]);
    assert!(matches!(opt.step(&two), Err(OptErr::ShapeMismatch { .. })));

    let mut snapshot = Snapshot::new(scalar_set(0., None));
    assert!(matches!(
        snapshot.set_param_groups(&two),
        Err(OptErr::ShapeMismatch { .. })
    ));
}
