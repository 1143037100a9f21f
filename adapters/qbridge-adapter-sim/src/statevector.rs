//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::PI;

use qbridge_pattern::Instruction;

/// A statevector over `2^n` complex amplitudes, qubit 0 least significant.
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    ///
    /// `num_qubits` must not exceed [`crate::MAX_SUPPORTED_QUBITS`].
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply a unitary instruction, or measure and collapse for `M`.
    ///
    /// Returns the measured bit for `M`, `None` otherwise.
    pub fn apply<R: Rng>(&mut self, instruction: &Instruction, rng: &mut R) -> Option<bool> {
        match *instruction {
            Instruction::I { .. } => {}
            Instruction::X { target } => self.apply_x(target),
            Instruction::Y { target } => self.apply_y(target),
            Instruction::Z { target } => self.apply_z(target),
            Instruction::H { target } => self.apply_h(target),
            Instruction::S { target } => self.apply_phase(target, PI / 2.0),
            Instruction::Rx { target, angle } => self.apply_rx(target, angle),
            Instruction::Ry { target, angle } => self.apply_ry(target, angle),
            Instruction::Rz { target, angle } => self.apply_rz(target, angle),
            Instruction::Cnot { control, target } => self.apply_cx(control, target),
            Instruction::Cz { control, target } => self.apply_cz(control, target),
            Instruction::Rzz {
                control,
                target,
                angle,
            } => self.apply_crz(control, target, PI * angle),
            Instruction::Swap { targets } => self.apply_swap(targets[0], targets[1]),
            Instruction::Ccx { controls, target } => {
                self.apply_ccx(controls[0], controls[1], target);
            }
            Instruction::M { target, .. } => return Some(self.measure(target, rng)),
        }
        None
    }

    // =========================================================================
    // Single-qubit kernels
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    // =========================================================================
    // Multi-qubit kernels
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let both = (1 << control) | (1 << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & both == both {
                *amp = -*amp;
            }
        }
    }

    fn apply_crz(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & ctrl_mask != 0 {
                *amp *= if i & tgt_mask == 0 { phase_0 } else { phase_1 };
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let controls = (1 << c1) | (1 << c2);
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & controls == controls) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Probability of reading `1` on `qubit`.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Sample `qubit`, project onto the outcome and renormalize.
    fn measure<R: Rng>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let p_one = self.probability_one(qubit);
        let outcome = rng.r#gen::<f64>() < p_one;
        let kept = if outcome { p_one } else { 1.0 - p_one };
        let norm = kept.sqrt();

        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                if norm > 0.0 {
                    *amp /= norm;
                }
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn run(sv: &mut Statevector, instructions: &[Instruction]) -> Vec<Option<bool>> {
        let mut rng = SmallRng::seed_from_u64(7);
        instructions.iter().map(|i| sv.apply(i, &mut rng)).collect()
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(sv.amplitudes[1..].iter().all(|a| a.norm() == 0.0));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        run(
            &mut sv,
            &[
                Instruction::H { target: 0 },
                Instruction::Cnot {
                    control: 0,
                    target: 1,
                },
            ],
        );

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_rzz_uses_half_turns() {
        // RZZ(1.0) on |11⟩ is a controlled RZ(pi): phase e^{i pi/2}
        let mut sv = Statevector::new(2);
        run(
            &mut sv,
            &[
                Instruction::X { target: 0 },
                Instruction::X { target: 1 },
                Instruction::Rzz {
                    control: 0,
                    target: 1,
                    angle: 1.0,
                },
            ],
        );
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 1.0)));
    }

    #[test]
    fn test_rzz_ignores_unset_control() {
        let mut sv = Statevector::new(2);
        run(
            &mut sv,
            &[
                Instruction::X { target: 1 },
                Instruction::Rzz {
                    control: 0,
                    target: 1,
                    angle: 0.5,
                },
            ],
        );
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_measure_collapses() {
        let mut sv = Statevector::new(2);
        let outcomes = run(
            &mut sv,
            &[
                Instruction::H { target: 0 },
                Instruction::Cnot {
                    control: 0,
                    target: 1,
                },
                Instruction::M {
                    target: 0,
                    clbit: None,
                },
            ],
        );
        let first = outcomes[2].unwrap();
        let expected = if first { 1.0 } else { 0.0 };
        assert!((sv.probability_one(1) - expected).abs() < 1e-10);
        let norm: f64 = sv.amplitudes().iter().map(|a| a.norm_sqr()).sum();
        assert!((norm - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_measure_deterministic_state() {
        let mut sv = Statevector::new(1);
        let outcomes = run(
            &mut sv,
            &[
                Instruction::X { target: 0 },
                Instruction::M {
                    target: 0,
                    clbit: None,
                },
            ],
        );
        assert_eq!(outcomes[1], Some(true));
    }

    #[test]
    fn test_ccx_and_swap() {
        let mut sv = Statevector::new(3);
        run(
            &mut sv,
            &[
                Instruction::X { target: 0 },
                Instruction::X { target: 1 },
                Instruction::Ccx {
                    controls: [0, 1],
                    target: 2,
                },
                Instruction::Swap { targets: [0, 2] },
            ],
        );
        // |111⟩ is invariant under the swap
        assert!(approx_eq(sv.amplitudes[0b111], Complex64::new(1.0, 0.0)));
    }
}
