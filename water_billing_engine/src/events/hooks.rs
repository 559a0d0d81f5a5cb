use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{BillCreatedEvent, BillPaidEvent, EventHandler, EventProducer, Handler, ReadingRecordedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub reading_recorded_producer: Vec<EventProducer<ReadingRecordedEvent>>,
    pub bill_created_producer: Vec<EventProducer<BillCreatedEvent>>,
    pub bill_paid_producer: Vec<EventProducer<BillPaidEvent>>,
}

pub struct EventHandlers {
    pub on_reading_recorded: Option<EventHandler<ReadingRecordedEvent>>,
    pub on_bill_created: Option<EventHandler<BillCreatedEvent>>,
    pub on_bill_paid: Option<EventHandler<BillPaidEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_reading_recorded = hooks.on_reading_recorded.map(|f| EventHandler::new(buffer_size, f));
        let on_bill_created = hooks.on_bill_created.map(|f| EventHandler::new(buffer_size, f));
        let on_bill_paid = hooks.on_bill_paid.map(|f| EventHandler::new(buffer_size, f));
        Self { on_reading_recorded, on_bill_created, on_bill_paid }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_reading_recorded {
            result.reading_recorded_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_bill_created {
            result.bill_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_bill_paid {
            result.bill_paid_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_reading_recorded {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_bill_created {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_bill_paid {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_reading_recorded: Option<Handler<ReadingRecordedEvent>>,
    pub on_bill_created: Option<Handler<BillCreatedEvent>>,
    pub on_bill_paid: Option<Handler<BillPaidEvent>>,
}

impl EventHooks {
    pub fn on_reading_recorded<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ReadingRecordedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_reading_recorded = Some(Arc::new(f));
        self
    }

    pub fn on_bill_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(BillCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_bill_created = Some(Arc::new(f));
        self
    }

    pub fn on_bill_paid<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(BillPaidEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_bill_paid = Some(Arc::new(f));
        self
    }
}
