//! End-to-end conversion tests.

use std::f64::consts::PI;
use std::sync::Arc;
use std::thread;

use qbridge_convert::{CanonicalGateSet, ConvertError, Converter, MEASURE};
use qbridge_ir::{Circuit, ClbitId, CustomGate, QubitId};
use qbridge_pattern::{Instruction, Kind};

const TOLERANCE: f64 = 1e-9;

fn convert(circuit: &Circuit) -> Vec<Instruction> {
    Converter::standard()
        .convert(circuit)
        .unwrap()
        .instructions()
        .to_vec()
}

#[test]
fn hadamard_lands_on_slot_zero() {
    let mut circuit = Circuit::with_size("h", 1, 0);
    circuit.h(QubitId(0)).unwrap();
    assert_eq!(convert(&circuit), [Instruction::H { target: 0 }]);
}

#[test]
fn cnot_keeps_operand_order() {
    let mut forward = Circuit::with_size("cx", 2, 0);
    forward.cx(QubitId(0), QubitId(1)).unwrap();
    assert_eq!(
        convert(&forward),
        [Instruction::Cnot {
            control: 0,
            target: 1
        }]
    );

    let mut reversed = Circuit::with_size("cx", 2, 0);
    reversed.cx(QubitId(1), QubitId(0)).unwrap();
    assert_eq!(
        convert(&reversed),
        [Instruction::Cnot {
            control: 1,
            target: 0
        }]
    );
}

#[test]
fn controlled_rotation_angle_is_transformed() {
    let theta = 0.7;
    let mut circuit = Circuit::with_size("crz", 2, 0);
    circuit.crz(theta, QubitId(0), QubitId(1)).unwrap();
    let out = convert(&circuit);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind(), Kind::Rzz);
    assert_eq!(out[0].qubits(), vec![0, 1]);
    let angle = out[0].angle().unwrap();
    assert!((angle - theta / PI).abs() < TOLERANCE);
    assert!((angle - theta).abs() > TOLERANCE);
}

#[test]
fn unsupported_kind_is_named() {
    let mut circuit = Circuit::with_size("custom", 2, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit
        .gate(CustomGate::new("mystery", 2), [QubitId(0), QubitId(1)])
        .unwrap();
    match Converter::standard().convert(&circuit) {
        Err(ConvertError::UnsupportedInstruction { kind }) => assert_eq!(kind, "mystery"),
        other => panic!("expected UnsupportedInstruction, got {other:?}"),
    }
}

#[test]
fn reset_is_rejected() {
    let mut circuit = Circuit::with_size("reset", 1, 0);
    circuit.x(QubitId(0)).unwrap().reset(QubitId(0)).unwrap();
    assert!(matches!(
        Converter::standard().convert(&circuit),
        Err(ConvertError::UnsupportedInstruction { kind }) if kind == "reset"
    ));
}

/// One-instruction circuits for every canonical kind.
#[test]
fn every_canonical_kind_round_trips() {
    let angle = 1.234_567_890_123;
    let cases: Vec<(Box<dyn Fn(&mut Circuit)>, Instruction)> = vec![
        (
            Box::new(|c: &mut Circuit| {
                c.id(QubitId(0)).unwrap();
            }),
            Instruction::I { target: 0 },
        ),
        (
            Box::new(|c: &mut Circuit| {
                c.x(QubitId(1)).unwrap();
            }),
            Instruction::X { target: 1 },
        ),
        (
            Box::new(|c: &mut Circuit| {
                c.y(QubitId(2)).unwrap();
            }),
            Instruction::Y { target: 2 },
        ),
        (
            Box::new(|c: &mut Circuit| {
                c.z(QubitId(0)).unwrap();
            }),
            Instruction::Z { target: 0 },
        ),
        (
            Box::new(|c: &mut Circuit| {
                c.s(QubitId(1)).unwrap();
            }),
            Instruction::S { target: 1 },
        ),
        (
            Box::new(move |c: &mut Circuit| {
                c.rx(angle, QubitId(0)).unwrap();
            }),
            Instruction::Rx { target: 0, angle },
        ),
        (
            Box::new(move |c: &mut Circuit| {
                c.ry(-angle, QubitId(1)).unwrap();
            }),
            Instruction::Ry {
                target: 1,
                angle: -angle,
            },
        ),
        (
            Box::new(move |c: &mut Circuit| {
                c.rz(angle, QubitId(2)).unwrap();
            }),
            Instruction::Rz { target: 2, angle },
        ),
        (
            Box::new(|c: &mut Circuit| {
                c.cz(QubitId(2), QubitId(0)).unwrap();
            }),
            Instruction::Cz {
                control: 2,
                target: 0,
            },
        ),
        (
            Box::new(move |c: &mut Circuit| {
                c.crz(angle, QubitId(1), QubitId(2)).unwrap();
            }),
            Instruction::Rzz {
                control: 1,
                target: 2,
                angle: angle / PI,
            },
        ),
        (
            Box::new(|c: &mut Circuit| {
                c.swap(QubitId(0), QubitId(2)).unwrap();
            }),
            Instruction::Swap { targets: [0, 2] },
        ),
        (
            Box::new(|c: &mut Circuit| {
                c.ccx(QubitId(2), QubitId(0), QubitId(1)).unwrap();
            }),
            Instruction::Ccx {
                controls: [2, 0],
                target: 1,
            },
        ),
        (
            Box::new(|c: &mut Circuit| {
                c.measure(QubitId(1), ClbitId(2)).unwrap();
            }),
            Instruction::M {
                target: 1,
                clbit: Some(2),
            },
        ),
    ];

    for (build, expected) in cases {
        let mut circuit = Circuit::with_size("one", 3, 3);
        build(&mut circuit);
        let out = convert(&circuit);
        assert_eq!(out.len(), 1, "{expected}");
        assert_eq!(out[0].kind(), expected.kind());
        assert_eq!(out[0].qubits(), expected.qubits());
        assert_eq!(out[0].clbit(), expected.clbit());
        match (out[0].angle(), expected.angle()) {
            (Some(a), Some(b)) => assert!((a - b).abs() < TOLERANCE, "{a} vs {b}"),
            (None, None) => {}
            other => panic!("angle mismatch {other:?}"),
        }
    }
}

#[test]
fn non_canonical_gates_decompose() {
    let mut circuit = Circuit::with_size("mixed", 3, 0);
    circuit
        .t(QubitId(0))
        .unwrap()
        .u(0.1, 0.2, 0.3, QubitId(1))
        .unwrap()
        .cp(0.4, QubitId(0), QubitId(2))
        .unwrap()
        .cswap(QubitId(0), QubitId(1), QubitId(2))
        .unwrap();
    let out = convert(&circuit);

    assert_eq!(
        out[..4],
        [
            Instruction::Rz {
                target: 0,
                angle: PI / 4.0
            },
            Instruction::Rz {
                target: 1,
                angle: 0.3
            },
            Instruction::Ry {
                target: 1,
                angle: 0.1
            },
            Instruction::Rz {
                target: 1,
                angle: 0.2
            },
        ]
    );
    assert_eq!(out[4].kind(), Kind::Rzz);
    assert!((out[4].angle().unwrap() - 0.4 / PI).abs() < TOLERANCE);
    let tail: Vec<_> = out[6..].iter().map(Instruction::kind).collect();
    assert_eq!(tail, [Kind::Cnot, Kind::Ccx, Kind::Cnot]);
}

#[test]
fn measure_all_maps_into_canonical_bits() {
    let mut circuit = Circuit::new("meas");
    circuit.add_qreg("a", 1).unwrap();
    circuit.add_qreg("b", 1).unwrap();
    circuit.h(QubitId(1)).unwrap().measure_all().unwrap();
    let target = Converter::standard().convert(&circuit).unwrap();

    assert_eq!(target.num_clbits(), 2);
    assert_eq!(
        target.instructions()[1..],
        [
            Instruction::M {
                target: 0,
                clbit: Some(0)
            },
            Instruction::M {
                target: 1,
                clbit: Some(1)
            },
        ]
    );
}

#[test]
fn restricted_gate_set_coexists_with_standard() {
    let restricted = Arc::new(
        CanonicalGateSet::standard()
            .restrict(&["h", "cz", "rz", MEASURE])
            .unwrap(),
    );
    let narrow = Converter::new(restricted);
    let wide = Converter::standard();

    let mut circuit = Circuit::with_size("cx", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let kinds: Vec<_> = narrow
        .convert(&circuit)
        .unwrap()
        .instructions()
        .iter()
        .map(Instruction::kind)
        .collect();
    assert_eq!(kinds, [Kind::H, Kind::Cz, Kind::H]);
    assert_eq!(wide.convert(&circuit).unwrap().len(), 1);
}

#[test]
fn restricted_gate_set_rejects_what_it_cannot_reach() {
    let set = Arc::new(CanonicalGateSet::standard().restrict(&["h", "cx"]).unwrap());
    let mut circuit = Circuit::with_size("ry", 1, 0);
    circuit.ry(0.5, QubitId(0)).unwrap();
    assert!(matches!(
        Converter::new(set).convert(&circuit),
        Err(ConvertError::UnsupportedInstruction { .. })
    ));
}

#[test]
fn conversion_is_reentrant() {
    let converter = Converter::standard();
    let circuit = Circuit::qft(4).unwrap();
    let expected = converter.convert(&circuit).unwrap();

    thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| converter.convert(&circuit).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn source_circuit_is_untouched() {
    let circuit = Circuit::ghz(3).unwrap();
    let before = circuit.clone();
    Converter::standard().convert(&circuit).unwrap();
    assert_eq!(circuit, before);
}
