use prbs_check::{Checker, CheckerState, Generator, Options, Prbs, PrbsConfig, Topology};
use prbs_lfsr::bits;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

const DATA_WIDTHS: [u32; 6] = [1, 3, 8, 13, 32, 64];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every preset, data width, topology and option combination.
fn configs() -> impl Iterator<Item = PrbsConfig> {
    Prbs::ALL.into_iter().flat_map(|prbs| {
        DATA_WIDTHS.into_iter().flat_map(move |width| {
            [Topology::Fibonacci, Topology::Galois]
                .into_iter()
                .flat_map(move |topology| {
                    [
                        Options::empty(),
                        Options::INVERT,
                        Options::REVERSE,
                        Options::REVERSE | Options::INVERT,
                    ]
                    .into_iter()
                    .map(move |options| {
                        PrbsConfig::preset(prbs, width)
                            .with_topology(topology)
                            .with_options(options)
                    })
                })
        })
    })
}

fn random_word(rng: &mut Pcg64, width: u32) -> u64 {
    rng.gen::<u64>() & bits::mask(width) as u64
}

#[test]
fn prbs7_known_sequence() {
    init_logging();
    const PRBS7: &str = "0000001000001100001010001111001000101100111010100111110100001110";

    let mut checker = Checker::new(PrbsConfig::new(7, 0x41, 1)).unwrap();
    for (i, bit) in PRBS7.bytes().enumerate() {
        checker.step((bit - b'0') as u64, true);
        if i >= 7 {
            assert_eq!(checker.error_out(), 0, "bit {}", i);
        }
    }

    let generated: String = Generator::new(PrbsConfig::new(7, 0x41, 1))
        .unwrap()
        .take(PRBS7.len())
        .map(|bit| if bit == 0 { '0' } else { '1' })
        .collect();
    assert_eq!(generated, PRBS7);
}

#[test]
fn generator_round_trip() {
    init_logging();
    for config in configs() {
        let sync = config.validate().unwrap().sync_steps() as usize;
        let generator = Generator::new(config.clone()).unwrap();
        let mut checker = Checker::new(config.clone()).unwrap();
        for (i, word) in generator.take(sync + 16).enumerate() {
            checker.step(word, true);
            if i >= sync {
                assert_eq!(checker.error_out(), 0, "{:?} word {}", config, i);
            }
        }
    }
}

#[test]
fn fibonacci_checker_is_in_step_from_reset() {
    for config in configs().filter(|c| c.topology == Topology::Fibonacci) {
        let mut generator = Generator::new(config.clone()).unwrap();
        let mut checker = Checker::new(config.clone()).unwrap();
        for i in 0..8 {
            generator.step(true);
            checker.step(generator.data_out(), true);
            assert_eq!(checker.error_out(), 0, "{:?} word {}", config, i);
            assert_eq!(checker.register(), generator.register(), "{:?}", config);
        }
    }
}

#[test]
fn reset_then_stall_keeps_initial_state() {
    let mut rng = Pcg64::seed_from_u64(1);
    for config in configs() {
        let seed = random_word(&mut rng, config.register_width);
        let config = config.with_initial_value(seed);
        let mut checker = Checker::new(config.clone()).unwrap();
        for _ in 0..3 {
            checker.step(random_word(&mut rng, config.data_width), true);
        }
        checker.reset();
        assert_eq!(checker.state(), CheckerState::Reset);
        for _ in 0..5 {
            checker.step(random_word(&mut rng, config.data_width), false);
            assert_eq!(checker.error_out(), 0);
            assert_eq!(checker.register(), config.initial_value);
        }
        assert_eq!(checker.state(), CheckerState::Running);
    }
}

#[test]
fn stalls_are_transparent() {
    let mut rng = Pcg64::seed_from_u64(2);
    for config in configs() {
        let sync = config.validate().unwrap().sync_steps();
        let mut generator = Generator::new(config.clone()).unwrap();
        let mut checker = Checker::new(config.clone()).unwrap();
        let mut valid_steps = 0;
        for _ in 0..64 {
            if rng.gen_bool(0.3) {
                let (register, error_out) = (checker.register(), checker.error_out());
                checker.step(random_word(&mut rng, config.data_width), false);
                assert_eq!(checker.register(), register);
                assert_eq!(checker.error_out(), error_out);
            } else {
                generator.step(true);
                checker.step(generator.data_out(), true);
                valid_steps += 1;
                if valid_steps > sync {
                    assert_eq!(checker.error_out(), 0, "{:?}", config);
                }
            }
        }
    }
}

#[test]
fn single_bit_errors_are_flagged_then_forgotten() {
    init_logging();
    let mut rng = Pcg64::seed_from_u64(3);
    for config in configs() {
        let sync = config.validate().unwrap().sync_steps() as usize;
        let words: Vec<u64> = Generator::new(config.clone())
            .unwrap()
            .take(3 * sync + 8)
            .collect();
        let target = sync + rng.gen_range(0..sync + 4);
        let bit = rng.gen_range(0..config.data_width);

        let mut checker = Checker::new(config.clone()).unwrap();
        for (i, &word) in words.iter().enumerate() {
            let word = if i == target { word ^ 1 << bit } else { word };
            checker.step(word, true);
            if i < target && i >= sync {
                assert_eq!(checker.error_out(), 0, "{:?} word {}", config, i);
            } else if i == target {
                assert_ne!(
                    checker.error_out() & 1 << bit,
                    0,
                    "{:?} missed bit {} of word {}",
                    config,
                    bit,
                    i
                );
            } else if i > target + sync {
                assert_eq!(
                    checker.error_out(),
                    0,
                    "{:?} still flagging {} words after the error",
                    config,
                    i - target
                );
            }
        }
    }
}

#[test]
fn error_word_latency_is_one_step() {
    let config = PrbsConfig::preset(Prbs::Prbs31, 32);
    let words: Vec<u64> = Generator::new(config.clone()).unwrap().take(6).collect();
    let mut checker = Checker::new(config).unwrap();
    checker.step(words[0], true);
    checker.step(words[1], true);
    assert_eq!(checker.error_out(), 0);
    checker.step(words[2] ^ 0x8000_0000, true);
    assert_ne!(checker.error_out(), 0);
    checker.step(words[3], false);
    assert_ne!(checker.error_out(), 0);
}

#[test]
fn reversed_run_mirrors_forward_run() {
    let mut rng = Pcg64::seed_from_u64(4);
    for config in configs().filter(|c| c.options.is_empty()) {
        let (width, data_width) = (config.register_width, config.data_width);
        let initial_value = random_word(&mut rng, width);
        let mut forward = Checker::new(config.clone().with_initial_value(initial_value)).unwrap();
        let mut reversed = Checker::new(
            config
                .clone()
                .with_initial_value(bits::reverse(initial_value as u128, width) as u64)
                .reversed(true),
        )
        .unwrap();
        for _ in 0..24 {
            let word = random_word(&mut rng, data_width);
            forward.step(word, true);
            reversed.step(bits::reverse(word as u128, data_width) as u64, true);
            assert_eq!(
                reversed.error_out(),
                bits::reverse(forward.error_out() as u128, data_width) as u64,
                "{:?}",
                config
            );
            assert_eq!(
                reversed.register(),
                bits::reverse(forward.register() as u128, width) as u64,
                "{:?}",
                config
            );
        }
    }
}

#[test]
fn inverted_run_matches_plain_run() {
    let mut rng = Pcg64::seed_from_u64(5);
    for config in configs().filter(|c| !c.is_inverted()) {
        let mask = bits::mask(config.data_width) as u64;
        let mut plain = Checker::new(config.clone()).unwrap();
        let mut inverted = Checker::new(config.clone().inverted(true)).unwrap();
        for _ in 0..24 {
            let word = random_word(&mut rng, config.data_width);
            plain.step(word, true);
            inverted.step(word ^ mask, true);
            assert_eq!(inverted.error_out(), plain.error_out(), "{:?}", config);
            assert_eq!(inverted.register(), plain.register(), "{:?}", config);
        }
    }
}

#[test]
fn random_data_is_not_accepted() {
    let mut rng = Pcg64::seed_from_u64(6);
    let mut checker = Checker::new(PrbsConfig::default()).unwrap();
    let flagged: u32 = (0..256)
        .map(|_| {
            checker.step(random_word(&mut rng, 8), true);
            checker.error_out().count_ones()
        })
        .sum();
    // Each error bit of random input is a fair coin.
    assert!((700..1350).contains(&flagged), "{} of 2048 bits flagged", flagged);
}

#[cfg(feature = "exhaustive-tests")]
#[test]
fn prbs15_full_period_round_trip() {
    for topology in [Topology::Fibonacci, Topology::Galois] {
        let config = PrbsConfig::preset(Prbs::Prbs15, 1).with_topology(topology);
        let generator = Generator::new(config.clone()).unwrap();
        let mut checker = Checker::new(config).unwrap();
        for (i, bit) in generator.take(2 * Prbs::Prbs15.period() as usize).enumerate() {
            checker.step(bit, true);
            if i >= 15 {
                assert_eq!(checker.error_out(), 0, "{} bit {}", topology, i);
            }
        }
    }
}
