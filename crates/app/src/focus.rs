use std::io::Write;
use std::time::Duration;

use services::PomodoroService;
use tokio::time::MissedTickBehavior;
use tracker_core::model::{Subject, UserAccount};
use tracker_core::timer::{PomodoroTimer, TimerEvent};

/// Result of a terminal focus run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusOutcome {
    pub completed: u32,
    pub sessions_today: u32,
    pub interrupted: bool,
}

/// Run work intervals until `cycles` are done or Ctrl-C arrives.
///
/// Every finished work interval is recorded immediately, so an interrupted
/// run keeps the intervals it already completed.
pub async fn run(
    pomodoro: &PomodoroService,
    user: &UserAccount,
    subject: Option<Subject>,
    cycles: u32,
) -> anyhow::Result<FocusOutcome> {
    let mut timer = PomodoroTimer::new(pomodoro.settings());
    let mut outcome = FocusOutcome {
        completed: 0,
        sessions_today: pomodoro.today_count(user.id).await?,
        interrupted: false,
    };
    if cycles == 0 {
        return Ok(outcome);
    }

    println!("{}", pomodoro.start(user.id, subject));
    timer.start();

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut interrupt => {
                tracing::info!(user_id = %user.id, completed = outcome.completed, "focus interrupted");
                outcome.interrupted = true;
                break;
            }
        }

        match timer.tick() {
            Some(TimerEvent::WorkCompleted { cycle }) => {
                let day = pomodoro.complete(user.id, subject).await?;
                outcome.completed += 1;
                outcome.sessions_today = day.sessions_completed;
                println!(
                    "\rWork interval {cycle} done. {} sessions today.",
                    day.sessions_completed
                );
                if outcome.completed >= cycles {
                    break;
                }
            }
            Some(TimerEvent::BreakCompleted) => println!("\rBreak over, back to work."),
            None => {}
        }
        print!("\r{} {}  ", timer.phase().label(), timer.remaining_label());
        std::io::stdout().flush()?;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use storage::InMemoryRepository;
    use storage::repository::{NewUser, UserRepository};
    use tracker_core::model::PomodoroSettings;
    use tracker_core::time::{Clock, fixed_now};

    use super::*;

    async fn fixture(settings: PomodoroSettings) -> (PomodoroService, UserAccount) {
        let repo = InMemoryRepository::new();
        let user = repo
            .insert_user(NewUser {
                username: "asha".into(),
                email: "asha@example.com".into(),
                password_hash: "x".into(),
                full_name: None,
                target_exam_year: None,
                is_active: true,
                is_admin: false,
                created_at: fixed_now(),
            })
            .await
            .unwrap();
        let service = PomodoroService::new(Clock::fixed(fixed_now()), Arc::new(repo), settings);
        (service, user)
    }

    #[tokio::test(start_paused = true)]
    async fn records_each_completed_work_interval() {
        let settings = PomodoroSettings::new(1, 1, 2, 4).unwrap();
        let (service, user) = fixture(settings).await;

        let outcome = run(&service, &user, Some(Subject::Physics), 2).await.unwrap();

        assert_eq!(outcome.completed, 2);
        assert_eq!(outcome.sessions_today, 2);
        assert!(!outcome.interrupted);
        assert_eq!(service.today_count(user.id).await.unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_cycles_records_nothing() {
        let (service, user) = fixture(PomodoroSettings::default()).await;
        let outcome = run(&service, &user, None, 0).await.unwrap();
        assert_eq!(outcome.completed, 0);
        assert_eq!(service.today_count(user.id).await.unwrap(), 0);
    }
}
