pub mod cross_entropy_loss;
