use std::error::Error;

use async_trait::async_trait;
use tokio::time::{sleep, Duration};

use directheap::{Poller, Scheduler, SchedulerConfig};

struct TestPoller;

#[async_trait]
impl Poller for TestPoller {
    async fn poll(&self, id: u64) -> anyhow::Result<Duration> {
        println!("[Poll] item: {}", id);
        if id == 3 {
            anyhow::bail!("item {} is unreachable", id);
        }
        Ok(Duration::from_millis(200 * id))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = SchedulerConfig {
        retry_delay: Duration::from_millis(500),
        ..Default::default()
    };
    let scheduler = Scheduler::new(TestPoller, config);

    for id in 1..=3 {
        scheduler.schedule(id, Duration::ZERO).await;
    }

    tokio::join!(scheduler.run(sleep(Duration::from_secs(2))), async {
        sleep(Duration::from_millis(700)).await;
        println!("[Cancel] item: 2");
        scheduler.cancel(2).await;
    });

    println!("{} items still scheduled", scheduler.len().await);

    Ok(())
}
