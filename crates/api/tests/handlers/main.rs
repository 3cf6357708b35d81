mod test_utils;

mod availability_test;
mod cart_test;
mod checkout_test;
mod middleware_test;
mod payment_test;
