//! State machine transitions
//!
//! `advance` runs once per scheduled frame and is the only place
//! time-driven state mutates. Player input flows through `submit_answer`
//! and `toggle_pause` directly, outside the frame cadence.

use super::asteroid::Asteroid;
use super::problem::Problem;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Score-derived growth multiplier, recomputed every tick.
/// Pure function of score; per-asteroid jitter rides on top of it.
pub fn difficulty_multiplier(score: u32) -> f32 {
    BASE_GROWTH_RATE + score as f32 * SPEED_PER_POINT
}

/// Advance the game by one tick.
///
/// No-op while paused or after game over. Grows every asteroid, applies
/// overflow penalties, replenishes the pool, and decays screen shake.
/// Once game over triggers, processing stops for the tick so lives never
/// go negative.
pub fn advance(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.paused || state.game_over {
        return events;
    }

    let difficulty_bonus = difficulty_multiplier(state.score) - BASE_GROWTH_RATE;

    let mut i = 0;
    while i < state.asteroids.len() {
        let asteroid = &mut state.asteroids[i];
        asteroid.size *= asteroid.growth_rate + difficulty_bonus;

        if asteroid.overflowed() {
            state.asteroids.remove(i);
            state.lives -= 1;
            state.shake_frames = SHAKE_FRAMES;
            events.push(GameEvent::LifeLost);

            if state.lives <= 0 {
                state.game_over = true;
                state.paused = true;
                events.push(GameEvent::GameOver {
                    final_score: state.score,
                });
                return events;
            }
        } else {
            i += 1;
        }
    }

    // Refill the pool, one spawn attempt per missing slot
    while state.asteroids.len() < ACTIVE_ASTEROIDS {
        let id = state.next_entity_id();
        let problem = Problem::generate(state.operation, &mut state.rng);
        match Asteroid::spawn(id, problem, state.viewport, &mut state.rng) {
            Some(asteroid) => state.asteroids.push(asteroid),
            None => {
                // No drawing surface yet; the set self-heals on later ticks
                break;
            }
        }
    }

    if state.shake_frames > 0 {
        state.shake_frames -= 1;
        if state.shake_frames == 0 {
            state.shake_frames = SHAKE_IDLE;
        }
    }

    events
}

/// Evaluate a submitted answer against the target asteroid (index 0).
///
/// Ignored entirely while paused, when no asteroid is present, or while the
/// answer lock is active - a locked submission must not re-trigger the
/// wrong-answer penalty.
pub fn submit_answer(state: &mut GameState, value: i64) -> Vec<GameEvent> {
    if state.paused || state.asteroids.is_empty() || state.answer_locked {
        return Vec::new();
    }

    if state.asteroids[0].problem.answer == value {
        state.asteroids.remove(0);
        state.score += 1;
        vec![GameEvent::Correct]
    } else {
        state.answer_locked = true;
        state.lock_generation += 1;
        vec![GameEvent::Incorrect {
            unlock_generation: state.lock_generation,
        }]
    }
}

/// Flip the pause flag. Inert after game over; only `reset` leaves that state.
pub fn toggle_pause(state: &mut GameState) {
    if !state.game_over {
        state.paused = !state.paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Operation;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running_state() -> GameState {
        let mut state = GameState::new(12345, Operation::Multiplication);
        state.set_viewport(1920.0, 1080.0);
        state
    }

    /// An asteroid with a known answer, bypassing the factory
    fn fixed_asteroid(id: u32, answer_first: i64, answer_second: i64) -> Asteroid {
        let mut rng = Pcg32::seed_from_u64(id as u64);
        let problem = Problem::from_operands(
            Operation::Multiplication,
            answer_first,
            answer_second,
            &mut rng,
        )
        .unwrap();
        Asteroid {
            id,
            problem,
            pos: glam::Vec2::new(100.0, 100.0),
            size: ASTEROID_START_SIZE,
            growth_rate: BASE_GROWTH_RATE,
            max_size: ASTEROID_MAX_SIZE,
        }
    }

    #[test]
    fn test_advance_replenishes_to_three() {
        let mut state = running_state();
        assert!(state.asteroids.is_empty());
        let events = advance(&mut state);
        assert_eq!(state.asteroids.len(), ACTIVE_ASTEROIDS);
        assert!(events.is_empty());

        // Pool stays at three on subsequent ticks
        advance(&mut state);
        assert_eq!(state.asteroids.len(), ACTIVE_ASTEROIDS);
    }

    #[test]
    fn test_advance_without_viewport_spawns_nothing() {
        let mut state = GameState::new(1, Operation::Addition);
        advance(&mut state);
        assert!(state.asteroids.is_empty());

        // Surface appears later; the set self-heals
        state.set_viewport(1280.0, 720.0);
        advance(&mut state);
        assert_eq!(state.asteroids.len(), ACTIVE_ASTEROIDS);
    }

    #[test]
    fn test_advance_noop_when_paused() {
        let mut state = running_state();
        advance(&mut state);
        let sizes: Vec<f32> = state.asteroids.iter().map(|a| a.size).collect();

        toggle_pause(&mut state);
        assert!(advance(&mut state).is_empty());
        let after: Vec<f32> = state.asteroids.iter().map(|a| a.size).collect();
        assert_eq!(sizes, after, "paused tick must not grow asteroids");
    }

    #[test]
    fn test_sizes_monotone_while_running() {
        let mut state = running_state();
        advance(&mut state);
        for _ in 0..50 {
            let before: Vec<f32> = state.asteroids.iter().map(|a| a.size).collect();
            advance(&mut state);
            for (a, b) in state.asteroids.iter().zip(before) {
                assert!(a.size >= b);
            }
        }
    }

    #[test]
    fn test_correct_answer_scores_and_removes_target() {
        let mut state = running_state();
        state.asteroids.push(fixed_asteroid(1, 7, 6));
        state.asteroids.push(fixed_asteroid(2, 3, 4));

        let events = submit_answer(&mut state, 42);
        assert_eq!(events, vec![GameEvent::Correct]);
        assert_eq!(state.score, 1);
        assert_eq!(state.asteroids.len(), 1);
        // The next-oldest asteroid becomes the target
        assert_eq!(state.target().unwrap().id, 2);
    }

    #[test]
    fn test_wrong_answer_locks_without_penalty() {
        let mut state = running_state();
        state.asteroids.push(fixed_asteroid(1, 7, 6));

        let events = submit_answer(&mut state, 41);
        assert_eq!(
            events,
            vec![GameEvent::Incorrect {
                unlock_generation: 1
            }]
        );
        assert!(state.answer_locked);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES, "wrong answers never cost a life");
        assert_eq!(state.asteroids.len(), 1);
    }

    #[test]
    fn test_locked_submissions_ignored() {
        let mut state = running_state();
        state.asteroids.push(fixed_asteroid(1, 7, 6));

        // Three wrong answers before the unlock timer fires
        submit_answer(&mut state, 41);
        let generation = state.lock_generation;
        assert!(submit_answer(&mut state, 40).is_empty());
        assert!(submit_answer(&mut state, 39).is_empty());

        // Even the correct answer is swallowed while locked
        assert!(submit_answer(&mut state, 42).is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(
            state.lock_generation, generation,
            "locked submissions must not re-arm the lock"
        );

        state.clear_answer_lock(generation);
        let events = submit_answer(&mut state, 42);
        assert_eq!(events, vec![GameEvent::Correct]);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_submit_with_no_asteroids_is_noop() {
        let mut state = running_state();
        assert!(submit_answer(&mut state, 42).is_empty());
        assert_eq!(state.score, 0);
        assert!(!state.answer_locked);
    }

    #[test]
    fn test_overflow_costs_one_life() {
        let mut state = running_state();
        let mut doomed = fixed_asteroid(state.next_entity_id(), 7, 6);
        doomed.size = doomed.max_size; // next growth tick pushes it over
        state.asteroids.push(doomed);
        let survivor_id = state.next_entity_id();
        state.asteroids.push(fixed_asteroid(survivor_id, 3, 4));

        let events = advance(&mut state);
        assert_eq!(events, vec![GameEvent::LifeLost]);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.shake_frames, SHAKE_FRAMES - 1); // decayed once this tick
        assert!(state.asteroids.iter().all(|a| a.id != 1));
        // Pool refilled after the removal
        assert_eq!(state.asteroids.len(), ACTIVE_ASTEROIDS);

        // The survivor does not lose another life next tick
        let events = advance(&mut state);
        assert!(events.is_empty());
        assert_eq!(state.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn test_multiple_overflows_same_tick() {
        let mut state = running_state();
        state.lives = 3;
        for id in 1..=2 {
            let mut doomed = fixed_asteroid(id, 7, 6);
            doomed.size = doomed.max_size;
            state.asteroids.push(doomed);
        }

        let events = advance(&mut state);
        assert_eq!(events, vec![GameEvent::LifeLost, GameEvent::LifeLost]);
        assert_eq!(state.lives, 1);
    }

    #[test]
    fn test_game_over_stops_processing_that_tick() {
        let mut state = running_state();
        state.lives = 1;
        state.score = 9;
        for id in 1..=3 {
            let mut doomed = fixed_asteroid(id, 7, 6);
            doomed.size = doomed.max_size;
            state.asteroids.push(doomed);
        }

        let events = advance(&mut state);
        assert_eq!(
            events,
            vec![GameEvent::LifeLost, GameEvent::GameOver { final_score: 9 }]
        );
        assert_eq!(state.lives, 0, "lives never go negative");
        assert!(state.game_over);
        assert!(state.paused);

        // Terminal until reset
        assert!(advance(&mut state).is_empty());
        toggle_pause(&mut state);
        assert!(state.paused, "pause toggle is inert after game over");
        assert!(state.game_over);

        state.reset();
        assert!(!state.game_over);
        let events = advance(&mut state);
        assert!(events.is_empty());
        assert_eq!(state.asteroids.len(), ACTIVE_ASTEROIDS);
    }

    #[test]
    fn test_shake_decays_to_idle() {
        let mut state = running_state();
        state.shake_frames = 2;
        advance(&mut state);
        assert_eq!(state.shake_frames, 1);
        advance(&mut state);
        assert_eq!(state.shake_frames, SHAKE_IDLE);
        advance(&mut state);
        assert_eq!(state.shake_frames, SHAKE_IDLE);
    }

    #[test]
    fn test_difficulty_scales_with_score() {
        assert_eq!(difficulty_multiplier(0), BASE_GROWTH_RATE);
        let m10 = difficulty_multiplier(10);
        let m20 = difficulty_multiplier(20);
        assert!(m10 > BASE_GROWTH_RATE);
        assert!((m20 - m10 - 10.0 * SPEED_PER_POINT).abs() < 1e-6);
    }

    #[test]
    fn test_determinism() {
        // Same seed, same inputs, same run
        let mut a = running_state();
        let mut b = running_state();
        for _ in 0..100 {
            advance(&mut a);
            advance(&mut b);
        }
        assert_eq!(a.asteroids.len(), b.asteroids.len());
        for (x, y) in a.asteroids.iter().zip(&b.asteroids) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.problem, y.problem);
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.size, y.size);
        }
    }
}
