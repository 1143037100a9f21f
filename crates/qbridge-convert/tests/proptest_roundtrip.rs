//! Property-based tests for register order and angle transforms.

use std::f64::consts::PI;

use proptest::prelude::*;
use qbridge_convert::Converter;
use qbridge_ir::{Circuit, QubitId};
use qbridge_pattern::Instruction;

/// Random register names and sizes; names are unique by construction.
fn arb_layout() -> impl Strategy<Value = Vec<(String, u32)>> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,6}", 1..=4)
        .prop_flat_map(|names| {
            let n = names.len();
            (Just(names), prop::collection::vec(1_u32..=3, n))
        })
        .prop_map(|(names, sizes)| names.into_iter().zip(sizes).collect())
}

fn build(layout: &[(String, u32)]) -> Circuit {
    let mut circuit = Circuit::new("layout");
    for (name, size) in layout {
        circuit.add_qreg(name.as_str(), *size).unwrap();
    }
    circuit
}

proptest! {
    /// Slot i of the source is slot i of the target, whatever the register names.
    #[test]
    fn register_order_is_preserved(layout in arb_layout()) {
        let mut circuit = build(&layout);
        let n = u32::try_from(circuit.num_qubits()).unwrap();
        for i in 0..n {
            circuit.x(QubitId(i)).unwrap();
        }
        for i in 1..n {
            circuit.cx(QubitId(i), QubitId(i - 1)).unwrap();
        }

        let target = Converter::standard().convert(&circuit).unwrap();
        prop_assert_eq!(target.width(), n as usize);

        let (singles, pairs) = target.instructions().split_at(n as usize);
        for (i, inst) in singles.iter().enumerate() {
            prop_assert_eq!(*inst, Instruction::X { target: i });
        }
        for (k, inst) in pairs.iter().enumerate() {
            prop_assert_eq!(*inst, Instruction::Cnot { control: k + 1, target: k });
        }
    }

    /// Rotations keep radians exactly; the controlled rotation becomes half-turns.
    #[test]
    fn angles_follow_alias_transforms(theta in -4.0 * PI..4.0 * PI) {
        let mut circuit = Circuit::with_size("angles", 2, 0);
        circuit
            .rx(theta, QubitId(0)).unwrap()
            .ry(theta, QubitId(1)).unwrap()
            .rz(theta, QubitId(0)).unwrap()
            .crz(theta, QubitId(1), QubitId(0)).unwrap();

        let target = Converter::standard().convert(&circuit).unwrap();
        let angles: Vec<f64> = target
            .instructions()
            .iter()
            .filter_map(Instruction::angle)
            .collect();

        prop_assert_eq!(angles[0].to_bits(), theta.to_bits());
        prop_assert_eq!(angles[1].to_bits(), theta.to_bits());
        prop_assert_eq!(angles[2].to_bits(), theta.to_bits());
        prop_assert!((angles[3] - theta / PI).abs() < 1e-9);
        prop_assert_eq!(target.instructions()[3].qubits(), vec![1, 0]);
    }
}
