//! Monte Carlo move evaluation.
//!
//! A candidate move is scored by playing it on a copy of the board and then
//! running many random playouts from the resulting position. The score is
//! the fraction of playouts the computer wins; ties and losses count as zero.
//!
//! The playouts are split into batches, one per worker. Every batch gets its
//! own generator seeded from a counter-based derivation of the evaluation
//! seed, so batch streams never coincide and a fixed seed reproduces the
//! same score. Workers share nothing mutable: each playout runs on a private
//! clone of the post-move board, and win counts are summed only after every
//! worker has been joined.

use fastrand::Rng;
use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::board::{Board, Move, Side};
use crate::config::Config;
use crate::playout::playout_in_place;
use crate::rules::{apply_move, legal_moves};

/// A candidate move with its estimated win rate for the computer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: f64,
}

/// Score `mv` for `computer` with `simulations` playouts over `parallelism` workers.
///
/// The candidate move itself is played deterministically; the playouts start
/// from the resulting position with the opponent to move. Returns a value in
/// `[0, 1]`. Zero simulations or workers are treated as one.
///
/// # Panics
/// If `mv` is not legal for `computer`.
pub fn score_move(
    board: &Board,
    mv: Move,
    computer: Side,
    simulations: usize,
    parallelism: usize,
    seed: u64,
) -> f64 {
    let mut start = board.clone();
    apply_move(&mut start, mv, computer);

    let jobs = batch_jobs(simulations.max(1), parallelism.max(1), seed);
    let run = |&(playouts, stream): &(usize, u64)| run_batch(&start, computer, playouts, stream);

    let wins: Vec<usize> = if jobs.len() <= 1 {
        jobs.iter().map(run).collect()
    } else {
        let pool = ThreadPoolBuilder::new().num_threads(jobs.len()).build();
        run_jobs(pool, &jobs, run)
    };
    win_rate(&jobs, &wins)
}

/// Batch sizes paired with their generator seeds.
fn batch_jobs(simulations: usize, parallelism: usize, seed: u64) -> Vec<(usize, u64)> {
    batch_sizes(simulations, parallelism)
        .into_iter()
        .enumerate()
        .map(|(i, n)| (n, batch_seed(seed, i as u64)))
        .collect()
}

/// Run every job on `pool`, or one after another on this thread if the pool
/// could not be built. Win counts come back in job order either way.
fn run_jobs<F>(
    pool: Result<ThreadPool, ThreadPoolBuildError>,
    jobs: &[(usize, u64)],
    run: F,
) -> Vec<usize>
where
    F: Fn(&(usize, u64)) -> usize + Send + Sync,
{
    match pool {
        Ok(pool) => pool.install(|| jobs.par_iter().map(&run).collect::<Vec<_>>()),
        Err(err) => {
            warn!("cannot start {} workers ({err}), evaluating sequentially", jobs.len());
            jobs.iter().map(&run).collect()
        }
    }
}

fn win_rate(jobs: &[(usize, u64)], wins: &[usize]) -> f64 {
    let total: usize = jobs.iter().map(|&(n, _)| n).sum();
    wins.iter().sum::<usize>() as f64 / total as f64
}

/// Run `playouts` random games from `start` (opponent to move) and count computer wins.
fn run_batch(start: &Board, computer: Side, playouts: usize, seed: u64) -> usize {
    let mut rng = Rng::with_seed(seed);
    let mut board = start.clone();
    (0..playouts)
        .filter(|_| {
            board.clone_from(start);
            playout_in_place(&mut board, computer.opponent(), &mut rng)
                .outcome
                .is_win_for(computer)
        })
        .count()
}

/// Split `total` into `parts` near-equal sizes, larger ones first. Empty
/// batches are dropped, so there are never more batches than playouts.
fn batch_sizes(total: usize, parts: usize) -> Vec<usize> {
    let base = total / parts;
    let extra = total % parts;
    (0..parts)
        .map(|i| base + usize::from(i < extra))
        .filter(|&n| n > 0)
        .collect()
}

/// SplitMix64 of `seed + index`. The mixer is a bijection, so distinct batch
/// indices always yield distinct seeds.
fn batch_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// The first move with the strictly highest score; ties keep the earlier move.
pub fn select_best(scored: &[ScoredMove]) -> Option<ScoredMove> {
    let mut best: Option<ScoredMove> = None;
    for &candidate in scored {
        if best.is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best
}

/// Move evaluator holding the tuning parameters and a stream of evaluation seeds.
pub struct Evaluator {
    simulations: usize,
    threads: usize,
    seeds: Rng,
}

impl Evaluator {
    pub fn new(config: &Config) -> Self {
        let seeds = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self {
            simulations: config.simulations.max(1),
            threads: config.threads.max(1),
            seeds,
        }
    }

    /// Score a single move with a fresh seed from the stream.
    pub fn score(&mut self, board: &Board, mv: Move, computer: Side) -> f64 {
        let seed = self.seeds.u64(..);
        score_move(board, mv, computer, self.simulations, self.threads, seed)
    }

    /// Score every legal move of `computer`, in scan order. Moves are
    /// evaluated one after another.
    pub fn evaluate_all(&mut self, board: &Board, computer: Side) -> Vec<ScoredMove> {
        legal_moves(board, computer)
            .into_iter()
            .map(|mv| {
                let score = self.score(board, mv, computer);
                debug!("{computer} {mv}: {:.1}%", score * 100.0);
                ScoredMove { mv, score }
            })
            .collect()
    }

    /// Best move for `computer`, or `None` if it has to pass.
    pub fn best_move(&mut self, board: &Board, computer: Side) -> Option<ScoredMove> {
        select_best(&self.evaluate_all(board, computer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_sizes() {
        assert_eq!(batch_sizes(20, 4), vec![5, 5, 5, 5]);
        assert_eq!(batch_sizes(10, 4), vec![3, 3, 2, 2]);
        assert_eq!(batch_sizes(2, 4), vec![1, 1]);
        assert_eq!(batch_sizes(7, 1), vec![7]);
    }

    #[test]
    fn test_batch_seeds_differ() {
        let seeds: Vec<u64> = (0..64).map(|i| batch_seed(12345, i)).collect();
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_ne!(batch_seed(1, 0), batch_seed(2, 0));
    }

    #[test]
    fn test_select_best_keeps_first_on_tie() {
        let scored = [
            ScoredMove { mv: Move::new(0, 1), score: 0.5 },
            ScoredMove { mv: Move::new(1, 0), score: 0.7 },
            ScoredMove { mv: Move::new(2, 2), score: 0.7 },
            ScoredMove { mv: Move::new(3, 1), score: 0.2 },
        ];
        assert_eq!(select_best(&scored).unwrap().mv, Move::new(1, 0));

        let flat = [
            ScoredMove { mv: Move::new(0, 1), score: 0.0 },
            ScoredMove { mv: Move::new(1, 0), score: 0.0 },
        ];
        assert_eq!(select_best(&flat).unwrap().mv, Move::new(0, 1));
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn test_certain_win_scores_one() {
        let board = Board::from_rows(&["XXXX", "XXXX", "XXXO", "XXX."]).unwrap();
        let score = score_move(&board, Move::new(3, 3), Side::Dark, 10, 3, 5);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_tie_does_not_count() {
        let board = Board::from_rows(&["OOOO", "OOOO", "XXXX", "XO.X"]).unwrap();
        let score = score_move(&board, Move::new(3, 2), Side::Dark, 10, 2, 5);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_same_seed_same_score() {
        let board = Board::new(6);
        let a = score_move(&board, Move::new(1, 2), Side::Dark, 200, 4, 77);
        let b = score_move(&board, Move::new(1, 2), Side::Dark, 200, 4, 77);
        assert_eq!(a, b);
        assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn test_zero_simulations_treated_as_one() {
        let board = Board::from_rows(&["XXXX", "XXXX", "XXXO", "XXX."]).unwrap();
        assert_eq!(score_move(&board, Move::new(3, 3), Side::Dark, 0, 0, 9), 1.0);

        let score = score_move(&Board::new(8), Move::new(2, 3), Side::Dark, 0, 2, 1);
        assert!(score == 0.0 || score == 1.0);
    }

    #[test]
    fn test_sequential_fallback_matches_pool() {
        let board = Board::new(6);
        let mv = Move::new(1, 2);
        let mut start = board.clone();
        apply_move(&mut start, mv, Side::Dark);
        let jobs = batch_jobs(200, 4, 77);
        let run = |&(n, s): &(usize, u64)| run_batch(&start, Side::Dark, n, s);

        let failing = ThreadPoolBuilder::new()
            .num_threads(jobs.len())
            .spawn_handler(|_| Err(std::io::Error::other("no threads")))
            .build();
        assert!(failing.is_err());
        let sequential = run_jobs(failing, &jobs, run);

        let pooled = run_jobs(ThreadPoolBuilder::new().num_threads(2).build(), &jobs, run);
        assert_eq!(sequential, pooled);
        assert_eq!(
            win_rate(&jobs, &sequential),
            score_move(&board, mv, Side::Dark, 200, 4, 77)
        );
    }

    #[test]
    fn test_board_not_mutated() {
        let board = Board::new(6);
        score_move(&board, Move::new(1, 2), Side::Dark, 50, 2, 1);
        assert_eq!(board, Board::new(6));
    }

    #[test]
    fn test_evaluator_best_move_is_legal() {
        let config = Config {
            size: 6,
            simulations: 40,
            threads: 2,
            seed: Some(3),
            ..Config::default()
        };
        let mut evaluator = Evaluator::new(&config);
        let board = Board::new(6);
        let scored = evaluator.evaluate_all(&board, Side::Light);
        assert_eq!(scored.len(), 4);
        let best = select_best(&scored).unwrap();
        assert!(legal_moves(&board, Side::Light).contains(&best.mv));
        assert!(scored.iter().all(|s| s.score <= best.score));
    }

    #[test]
    fn test_no_move_to_evaluate() {
        let config = Config {
            size: 4,
            simulations: 10,
            threads: 1,
            seed: Some(1),
            ..Config::default()
        };
        let mut evaluator = Evaluator::new(&config);
        let board = Board::from_rows(&["XXXX", "XXXX", "OOOO", "OOOO"]).unwrap();
        assert_eq!(evaluator.best_move(&board, Side::Dark), None);
    }
}
