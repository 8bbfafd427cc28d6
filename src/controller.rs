use std::pin::Pin;
use std::task::{Context, Poll};

use log::info;
use tower::filter::{Filter, FilterLayer, Predicate};
use tower::{BoxError, Service, ServiceBuilder};

use crate::config::Config;
use crate::elevator::Elevator;
use crate::types::event::Call;

/// Rejects calls for floors outside the serviced range. The queue and the
/// car trust their callers on bounds, so this is the only place the range
/// is enforced.
#[derive(Debug, Clone)]
pub struct BoundsCheck {
    lowest: i32,
    highest: i32,
}

impl Predicate<Call> for BoundsCheck {
    type Request = Call;

    fn check(&mut self, call: Call) -> Result<Self::Request, BoxError> {
        if let Call::Stop(floor) = call {
            if !(self.lowest..=self.highest).contains(&floor) {
                return Err(BoxError::from(format!(
                    "floor {floor} is outside the serviced range {}-{}",
                    self.lowest, self.highest
                )));
            }
        }
        Ok(call)
    }
}

/// Forwards validated calls to the car.
#[derive(Clone)]
pub struct DispatchService {
    elevator: Elevator,
}

impl Service<Call> for DispatchService {
    type Response = ();
    type Error = anyhow::Error;
    type Future = Pin<Box<dyn Future<Output = Result<(), Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, call: Call) -> Self::Future {
        let elevator = self.elevator.clone();
        Box::pin(async move {
            match call {
                Call::Stop(floor) => {
                    elevator.add_stop(floor).await?;
                    info!("accepted call for floor {floor}");
                }
                Call::Travel => {
                    elevator.travel().await;
                    info!("drain started");
                }
            }
            Ok(())
        })
    }
}

pub type Dispatcher = Filter<DispatchService, BoundsCheck>;

/// Builds the dispatch pipeline: bounds validation in front of the car.
pub fn dispatcher(elevator: Elevator, config: &Config) -> Dispatcher {
    ServiceBuilder::new()
        .layer(FilterLayer::new(BoundsCheck {
            lowest: config.lowest_floor,
            highest: config.highest_floor,
        }))
        .service(DispatchService { elevator })
}
