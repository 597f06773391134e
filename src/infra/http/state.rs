use std::sync::Arc;

use crate::application::employees::EmployeeService;
use crate::application::reports::ReportService;
use crate::application::repos::HealthRepo;
use crate::application::sales::SaleService;

#[derive(Clone)]
pub struct ApiState {
    pub employees: Arc<EmployeeService>,
    pub sales: Arc<SaleService>,
    pub reports: Arc<ReportService>,
    pub health: Arc<dyn HealthRepo>,
}
