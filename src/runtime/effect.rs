use crate::lookup::LookupRequest;
use crate::runtime::event::SearchAction;
use crate::runtime::scheduler::SchedulerCommand;

#[derive(Debug, Clone)]
pub enum Effect {
    Action(SearchAction),
    Schedule(SchedulerCommand),
    Lookup(LookupRequest),
    RequestRender,
}
